//! Accumulated, queryable state of one extraction run.
//!
//! Writes are append-only: merging a bundle never removes, rewrites, or
//! unifies facts, and duplicate facts across recognizer families are kept.
//! Reads are pure derivations over the accumulated bundles; anything that
//! needs cross-file knowledge (hierarchy, rankings, tallies) is recomputed
//! from the retained bundles on every call rather than cached.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::extractors::base::{
    CallSiteFact, ComponentFact, EndpointFact, FileBundle, HookFact, HttpMethod, ImportKind,
    InterfaceFact, RouteFact, SecurityConcern, ServiceFact, StatePatternFact, TableFact,
    TransitionFact, TypeAliasFact, TypeCategory,
};
use crate::extractors::manager::COMPLEXITY_THRESHOLD;

/// A declaration that crossed the complexity threshold.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComplexEntry {
    pub name: String,
    pub complexity: u32,
    pub file_path: String,
}

/// A heuristic issue attributed to a declaration.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IssueEntry {
    pub name: String,
    pub file_path: String,
    pub issue: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ProjectIndex {
    bundles: Vec<FileBundle>,
    complex: Vec<ComplexEntry>,
    issues: Vec<IssueEntry>,
    /// Declaration name -> hooks it uses, across all files.
    hook_usages: BTreeMap<String, BTreeSet<String>>,
    /// Declaration name -> network call shapes it makes.
    api_usages: BTreeMap<String, BTreeSet<String>>,
    total_lines: usize,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file's bundle. Never removes or overwrites.
    pub fn merge(&mut self, bundle: FileBundle) {
        for component in &bundle.components {
            if component.complexity > COMPLEXITY_THRESHOLD {
                self.complex.push(ComplexEntry {
                    name: component.name.clone(),
                    complexity: component.complexity,
                    file_path: component.file_path.clone(),
                });
            }
            for issue in component
                .performance_issues
                .iter()
                .chain(&component.platform_issues)
            {
                self.issues.push(IssueEntry {
                    name: component.name.clone(),
                    file_path: component.file_path.clone(),
                    issue: issue.clone(),
                });
            }
            if !component.hooks_used.is_empty() {
                self.hook_usages
                    .entry(component.name.clone())
                    .or_default()
                    .extend(component.hooks_used.iter().cloned());
            }
            if !component.api_calls.is_empty() {
                self.api_usages
                    .entry(component.name.clone())
                    .or_default()
                    .extend(component.api_calls.iter().cloned());
            }
        }
        for hook in &bundle.hooks {
            if !hook.uses_hooks.is_empty() {
                self.hook_usages
                    .entry(hook.name.clone())
                    .or_default()
                    .extend(hook.uses_hooks.iter().cloned());
            }
            if !hook.api_calls.is_empty() {
                self.api_usages
                    .entry(hook.name.clone())
                    .or_default()
                    .extend(hook.api_calls.iter().cloned());
            }
        }

        // +3 covers the header and separator framing around each summary.
        if !bundle.summary_lines.is_empty() {
            self.total_lines += bundle.summary_lines.len() + 3;
        }
        self.bundles.push(bundle);
    }

    /// Reportable lines accumulated so far; monotonically non-decreasing.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines the bundle would add if merged.
    pub fn lines_for(bundle: &FileBundle) -> usize {
        if bundle.summary_lines.is_empty() {
            0
        } else {
            bundle.summary_lines.len() + 3
        }
    }

    pub fn bundles(&self) -> &[FileBundle] {
        &self.bundles
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentFact> {
        self.bundles.iter().flat_map(|b| b.components.iter())
    }

    pub fn hooks(&self) -> impl Iterator<Item = &HookFact> {
        self.bundles.iter().flat_map(|b| b.hooks.iter())
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceFact> {
        self.bundles.iter().flat_map(|b| b.services.iter())
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &InterfaceFact> {
        self.bundles.iter().flat_map(|b| b.interfaces.iter())
    }

    pub fn type_aliases(&self) -> impl Iterator<Item = &TypeAliasFact> {
        self.bundles.iter().flat_map(|b| b.type_aliases.iter())
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteFact> {
        self.bundles.iter().flat_map(|b| b.routes.iter())
    }

    pub fn transitions(&self) -> impl Iterator<Item = &TransitionFact> {
        self.bundles.iter().flat_map(|b| b.transitions.iter())
    }

    pub fn state_patterns(&self) -> impl Iterator<Item = &StatePatternFact> {
        self.bundles.iter().flat_map(|b| b.state_patterns.iter())
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableFact> {
        self.bundles.iter().flat_map(|b| b.tables.iter())
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &EndpointFact> {
        self.bundles.iter().flat_map(|b| b.endpoints.iter())
    }

    pub fn call_sites(&self) -> impl Iterator<Item = &CallSiteFact> {
        self.bundles.iter().flat_map(|b| b.call_sites.iter())
    }

    pub fn security_concerns(&self) -> impl Iterator<Item = &SecurityConcern> {
        self.bundles.iter().flat_map(|b| b.security.iter())
    }

    pub fn complex_components(&self) -> &[ComplexEntry] {
        &self.complex
    }

    pub fn issues(&self) -> &[IssueEntry] {
        &self.issues
    }

    pub fn hook_usages(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.hook_usages
    }

    pub fn api_usages(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.api_usages
    }

    /// Declaration name -> imported names this declaration's file uses as
    /// markup tags. Recomputed from the retained bundles on every call.
    pub fn build_hierarchy(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut hierarchy: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for bundle in &self.bundles {
            if bundle.used_tags.is_empty() {
                continue;
            }
            for component in &bundle.components {
                hierarchy
                    .entry(component.name.clone())
                    .or_default()
                    .extend(bundle.used_tags.iter().cloned());
            }
        }
        hierarchy
    }

    /// Complexity ranking, ties broken by first-encountered order.
    pub fn top_by_complexity(&self, n: usize) -> Vec<&ComplexEntry> {
        let mut ranked: Vec<&ComplexEntry> = self.complex.iter().collect();
        ranked.sort_by(|a, b| b.complexity.cmp(&a.complexity));
        ranked.truncate(n);
        ranked
    }

    /// Interfaces ranked by property count, ties first-encountered.
    pub fn top_interfaces(&self, n: usize) -> Vec<&InterfaceFact> {
        let mut ranked: Vec<&InterfaceFact> = self.interfaces().collect();
        ranked.sort_by(|a, b| b.properties.len().cmp(&a.properties.len()));
        ranked.truncate(n);
        ranked
    }

    pub fn endpoints_by_method(&self) -> BTreeMap<HttpMethod, Vec<&EndpointFact>> {
        let mut grouped: BTreeMap<HttpMethod, Vec<&EndpointFact>> = BTreeMap::new();
        for endpoint in self.endpoints() {
            grouped.entry(endpoint.method).or_default().push(endpoint);
        }
        grouped
    }

    /// Import sources ranked by total import count (named + default +
    /// side-effect), ties broken by first-encountered order.
    pub fn modules_by_import_count(&self) -> Vec<ModuleImports> {
        let mut order = Vec::new();
        let mut by_source: BTreeMap<String, ModuleImports> = BTreeMap::new();

        for bundle in &self.bundles {
            for import in &bundle.imports {
                let entry = by_source
                    .entry(import.source.clone())
                    .or_insert_with(|| {
                        order.push(import.source.clone());
                        ModuleImports::new(&import.source)
                    });
                match import.kind {
                    ImportKind::Named => entry.named += 1,
                    ImportKind::Default => entry.default += 1,
                    ImportKind::SideEffect => entry.side_effect += 1,
                }
            }
        }

        let mut ranked: Vec<ModuleImports> = order
            .into_iter()
            .filter_map(|source| by_source.get(&source).cloned())
            .collect();
        ranked.sort_by(|a, b| b.total().cmp(&a.total()));
        ranked
    }

    pub fn alias_category_tallies(&self) -> BTreeMap<TypeCategory, usize> {
        let mut tallies = BTreeMap::new();
        for alias in self.type_aliases() {
            *tallies.entry(alias.category).or_insert(0) += 1;
        }
        tallies
    }

    pub fn security_by_issue(&self) -> BTreeMap<String, Vec<&SecurityConcern>> {
        let mut grouped: BTreeMap<String, Vec<&SecurityConcern>> = BTreeMap::new();
        for concern in self.security_concerns() {
            grouped.entry(concern.issue.clone()).or_default().push(concern);
        }
        grouped
    }

    pub fn total_style_rules(&self) -> usize {
        self.bundles
            .iter()
            .flat_map(|b| b.styles.iter())
            .map(|s| s.rule_count)
            .sum()
    }

    pub fn files_with_inline_styles(&self) -> usize {
        self.bundles.iter().filter(|b| b.inline_style_count > 0).count()
    }
}

/// Per-source import tally for the module dependency section.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModuleImports {
    pub source: String,
    pub named: usize,
    pub default: usize,
    pub side_effect: usize,
}

impl ModuleImports {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            named: 0,
            default: 0,
            side_effect: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.named + self.default + self.side_effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extractors::manager::aggregate_content;

    fn bundle_for(content: &str, rel_path: &str) -> FileBundle {
        aggregate_content(content, rel_path, &ExtractConfig::default()).unwrap()
    }

    #[test]
    fn merge_is_append_only_and_keeps_duplicates() {
        let mut index = ProjectIndex::new();
        let content = "export const Tag = () => { return (<View />); };";
        index.merge(bundle_for(content, "a.tsx"));
        index.merge(bundle_for(content, "b.tsx"));
        // The same declaration name from two files stays duplicated.
        assert_eq!(index.components().count(), 2);
    }

    #[test]
    fn total_lines_is_monotone() {
        let mut index = ProjectIndex::new();
        let mut last = 0;
        for name in ["a.tsx", "b.tsx", "c.tsx"] {
            index.merge(bundle_for(
                "export const Probe = () => { return (<View />); };",
                name,
            ));
            assert!(index.total_lines() >= last);
            last = index.total_lines();
        }
    }

    #[test]
    fn hierarchy_links_declarations_to_used_tags() {
        let mut index = ProjectIndex::new();
        let content = r#"
import { Avatar } from './Avatar';

export const Profile = () => {
  return (
    <Avatar size={40} />
  );
};
"#;
        index.merge(bundle_for(content, "src/Profile.tsx"));
        let hierarchy = index.build_hierarchy();
        assert!(hierarchy.get("Profile").is_some_and(|c| c.contains("Avatar")));
    }

    #[test]
    fn complexity_ranking_is_stable_for_ties() {
        let mut index = ProjectIndex::new();
        for (name, complexity) in [("First", 12), ("Second", 12), ("Third", 15)] {
            index.complex.push(ComplexEntry {
                name: name.to_string(),
                complexity,
                file_path: "x.tsx".to_string(),
            });
        }
        let top = index.top_by_complexity(3);
        assert_eq!(top[0].name, "Third");
        assert_eq!(top[1].name, "First");
        assert_eq!(top[2].name, "Second");
    }

    #[test]
    fn module_ranking_counts_import_kinds() {
        let mut index = ProjectIndex::new();
        let content = r#"
import React from 'react';
import { View, Text } from 'react-native';
import { useMemo } from 'react';
"#;
        index.merge(bundle_for(content, "src/App.tsx"));
        let ranked = index.modules_by_import_count();
        assert_eq!(ranked[0].source, "react-native");
        assert_eq!(ranked[0].named, 2);
        assert_eq!(ranked[1].source, "react");
        assert_eq!(ranked[1].named, 1);
        assert_eq!(ranked[1].default, 1);
    }
}
