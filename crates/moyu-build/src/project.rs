// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A minimal MSBuild project model.
//!
//! The model mirrors the shape of an MSBuild file: a root `Project` holding
//! property groups and item groups. It is built in memory and serialized in a
//! single pass, so the same model always produces the same bytes.

use crate::error::{BuildError, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";
const INDENT: &str = "  ";

/// The root element of a generated project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub default_targets: String,
    /// Omitted from the output when `None`.
    pub tools_version: Option<String>,
    property_groups: Vec<PropertyGroup>,
    item_groups: Vec<ItemGroup>,
}

/// A `<PropertyGroup>` of name/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyGroup {
    properties: Vec<(String, String)>,
}

/// An `<ItemGroup>` of items, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemGroup {
    items: Vec<ProjectItem>,
}

/// A single item such as `<ClCompile Include="main.c" />`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub kind: String,
    pub include: String,
    metadata: Vec<(String, String)>,
}

impl ProjectRoot {
    pub fn new() -> Self {
        Self {
            default_targets: "Build".to_string(),
            tools_version: None,
            property_groups: Vec::new(),
            item_groups: Vec::new(),
        }
    }

    pub fn add_property_group(&mut self) -> &mut PropertyGroup {
        self.property_groups.push(PropertyGroup::default());
        let last = self.property_groups.len() - 1;
        &mut self.property_groups[last]
    }

    pub fn add_item_group(&mut self) -> &mut ItemGroup {
        self.item_groups.push(ItemGroup::default());
        let last = self.item_groups.len() - 1;
        &mut self.item_groups[last]
    }

    pub fn property_groups(&self) -> &[PropertyGroup] {
        &self.property_groups
    }

    pub fn item_groups(&self) -> &[ItemGroup] {
        &self.item_groups
    }

    /// Iterates over every item of the given kind across all item groups.
    pub fn items_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a ProjectItem> {
        self.item_groups
            .iter()
            .flat_map(|group| group.items.iter())
            .filter(move |item| item.kind == kind)
    }

    /// Serializes the project to MSBuild XML.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        out.push_str("<Project");
        if !self.default_targets.is_empty() {
            let _ = write!(
                out,
                " DefaultTargets=\"{}\"",
                escape_attr(&self.default_targets)
            );
        }
        if let Some(tools) = self.tools_version.as_deref().filter(|v| !v.is_empty()) {
            let _ = write!(out, " ToolsVersion=\"{}\"", escape_attr(tools));
        }
        let _ = writeln!(out, " xmlns=\"{}\">", MSBUILD_NAMESPACE);

        for group in &self.property_groups {
            group.write_xml(&mut out);
        }
        for group in &self.item_groups {
            group.write_xml(&mut out);
        }

        out.push_str("</Project>\n");
        out
    }

    /// Writes the project to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml()).map_err(|source| BuildError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for ProjectRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyGroup {
    pub fn add_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn write_xml(&self, out: &mut String) {
        if self.properties.is_empty() {
            let _ = writeln!(out, "{INDENT}<PropertyGroup />");
            return;
        }
        let _ = writeln!(out, "{INDENT}<PropertyGroup>");
        for (name, value) in &self.properties {
            let _ = writeln!(out, "{INDENT}{INDENT}<{name}>{}</{name}>", escape_text(value));
        }
        let _ = writeln!(out, "{INDENT}</PropertyGroup>");
    }
}

impl ItemGroup {
    pub fn add_item(&mut self, kind: impl Into<String>, include: impl Into<String>) -> &mut ProjectItem {
        self.items.push(ProjectItem {
            kind: kind.into(),
            include: include.into(),
            metadata: Vec::new(),
        });
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn items(&self) -> &[ProjectItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn write_xml(&self, out: &mut String) {
        if self.items.is_empty() {
            let _ = writeln!(out, "{INDENT}<ItemGroup />");
            return;
        }
        let _ = writeln!(out, "{INDENT}<ItemGroup>");
        for item in &self.items {
            item.write_xml(out);
        }
        let _ = writeln!(out, "{INDENT}</ItemGroup>");
    }
}

impl ProjectItem {
    pub fn add_metadata(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.metadata.push((name.into(), value.into()));
    }

    pub fn metadata(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn write_xml(&self, out: &mut String) {
        let open = format!(
            "{INDENT}{INDENT}<{} Include=\"{}\"",
            self.kind,
            escape_attr(&self.include)
        );
        if self.metadata.is_empty() {
            let _ = writeln!(out, "{open} />");
            return;
        }
        let _ = writeln!(out, "{open}>");
        for (name, value) in &self.metadata {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}{INDENT}<{name}>{}</{name}>",
                escape_text(value)
            );
        }
        let _ = writeln!(out, "{INDENT}{INDENT}</{}>", self.kind);
    }
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
