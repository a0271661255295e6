//! Report rendering.
//!
//! Four encodings over the same index: plain structured text, a
//! machine-readable tree, a human-readable outline, and hypertext. All are
//! pure functions of the index content and the run accounting; none performs
//! additional analysis, and none embeds run timestamps, so identical input
//! yields identical bytes. Sections are emitted only when their backing collection is
//! non-empty; tabular sections truncate to a fixed top-N with an explicit
//! remainder marker.

pub mod hypertext;
pub mod outline;
pub mod plain;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::index::ProjectIndex;
use crate::runner::RunStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Plain,
    Tree,
    Outline,
    Hypertext,
}

impl ReportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "plain" | "text" => Some(ReportFormat::Plain),
            "tree" | "json" => Some(ReportFormat::Tree),
            "outline" | "markdown" => Some(ReportFormat::Outline),
            "hypertext" | "html" => Some(ReportFormat::Hypertext),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Plain => "plain",
            ReportFormat::Tree => "tree",
            ReportFormat::Outline => "outline",
            ReportFormat::Hypertext => "hypertext",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn render(index: &ProjectIndex, stats: &RunStats, format: ReportFormat) -> String {
    match format {
        ReportFormat::Plain => plain::render(index, stats),
        ReportFormat::Tree => tree::render(index, stats),
        ReportFormat::Outline => outline::render(index, stats),
        ReportFormat::Hypertext => hypertext::render(index, stats),
    }
}

/// Visible prefix of a collection plus the exact count left out.
pub(crate) fn truncated<T>(items: &[T], n: usize) -> (&[T], usize) {
    if items.len() > n {
        (&items[..n], items.len() - n)
    } else {
        (items, 0)
    }
}

/// Last path segment, for compact file attributions.
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extractors::manager::aggregate_content;

    #[test]
    fn every_encoding_reports_the_same_facts() {
        let mut index = ProjectIndex::new();
        let content = r#"
export class BillingService {
  async charge(): Promise<Receipt> {
    return axios.post('/billing/charge');
  }
  async refund(): Promise<Receipt> {
    return axios.post('/billing/refund');
  }
}
"#;
        let config = ExtractConfig::default();
        index.merge(
            aggregate_content(content, "src/services/billing.ts", &config).unwrap(),
        );

        let stats = RunStats {
            processed: 1,
            ..RunStats::default()
        };
        for format in [
            ReportFormat::Plain,
            ReportFormat::Tree,
            ReportFormat::Outline,
            ReportFormat::Hypertext,
        ] {
            let output = render(&index, &stats, format);
            assert!(
                output.contains("BillingService"),
                "{format} encoding dropped the service"
            );
            assert!(
                output.contains("/billing/charge") && output.contains("/billing/refund"),
                "{format} encoding dropped an endpoint"
            );
        }
    }

    #[test]
    fn format_names_round_trip() {
        for format in [
            ReportFormat::Plain,
            ReportFormat::Tree,
            ReportFormat::Outline,
            ReportFormat::Hypertext,
        ] {
            assert_eq!(ReportFormat::from_name(format.name()), Some(format));
        }
        assert_eq!(ReportFormat::from_name("yaml"), None);
    }

    #[test]
    fn truncation_reports_exact_remainder() {
        let items: Vec<u32> = (0..12).collect();
        let (visible, rest) = truncated(&items, 10);
        assert_eq!(visible.len(), 10);
        assert_eq!(rest, 2);

        let (all, none) = truncated(&items, 20);
        assert_eq!(all.len(), 12);
        assert_eq!(none, 0);
    }
}
