use super::config::{DispersionPolicy, SmallGroupPolicy, UnmatchedLabelPolicy};
use super::error::EngineError;
use crate::core::models::configuration::Configuration;
use crate::core::models::dispersion::DispersionResult;
use crate::core::models::labels::CategoryLabels;
use crate::core::utils::geometry::{centroid, mean_distance_to};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// A non-fatal irregularity encountered while grouping labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DispersionWarning {
    /// A label names an identifier that is not part of the embedding.
    UnmatchedLabel { identifier: String, category: String },
    /// Every labelled member of the category was unmatched, so it has no result.
    EmptyCategory { category: String },
    /// An embedded entity carries no label and is excluded from every category.
    UnlabeledEntity { identifier: String },
    /// The category has fewer than two members and its dispersion is undefined.
    UndefinedDispersion { category: String, count: usize },
}

impl fmt::Display for DispersionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedLabel {
                identifier,
                category,
            } => write!(
                f,
                "label '{}' -> '{}' does not match any embedded entity",
                identifier, category
            ),
            Self::EmptyCategory { category } => {
                write!(f, "category '{}' has no embedded members", category)
            }
            Self::UnlabeledEntity { identifier } => {
                write!(f, "entity '{}' has no category label", identifier)
            }
            Self::UndefinedDispersion { category, count } => write!(
                f,
                "dispersion of category '{}' is undefined ({} member(s))",
                category, count
            ),
        }
    }
}

/// Per-category results, sorted by category name, plus any warnings raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DispersionReport {
    pub results: Vec<DispersionResult>,
    pub warnings: Vec<DispersionWarning>,
}

impl DispersionReport {
    pub fn get(&self, category: &str) -> Option<&DispersionResult> {
        self.results
            .binary_search_by(|r| r.category.as_str().cmp(category))
            .ok()
            .map(|i| &self.results[i])
    }

    /// Dispersion of `numerator` divided by that of `denominator`.
    ///
    /// `None` if either category is missing or undefined, or the denominator is zero.
    pub fn ratio(&self, numerator: &str, denominator: &str) -> Option<f64> {
        let a = self.get(numerator)?.dispersion?;
        let b = self.get(denominator)?.dispersion?;
        (b > 0.0).then(|| a / b)
    }
}

/// Groups the embedded entities by category and measures each category's spread.
///
/// Labels are joined by identifier. The grouping is built once; each group's centroid is
/// the mean of its member points and its dispersion the mean member distance to it.
///
/// # Errors
///
/// Returns [`EngineError::UnknownCategory`] for the first unmatched label when
/// `policy.unmatched_labels` is [`UnmatchedLabelPolicy::Fail`].
#[instrument(skip_all, name = "dispersion_analysis", fields(entities = configuration.len(), labels = labels.len()))]
pub fn analyze(
    configuration: &Configuration,
    labels: &CategoryLabels,
    policy: &DispersionPolicy,
) -> Result<DispersionReport, EngineError> {
    let mut warnings = Vec::new();
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();

    for (identifier, category) in labels.iter() {
        match configuration.index_of(identifier) {
            Some(index) => groups.entry(category).or_default().push(index),
            None => {
                if policy.unmatched_labels == UnmatchedLabelPolicy::Fail {
                    return Err(EngineError::UnknownCategory {
                        identifier: identifier.to_string(),
                        category: category.to_string(),
                    });
                }
                groups.entry(category).or_default();
                warnings.push(DispersionWarning::UnmatchedLabel {
                    identifier: identifier.to_string(),
                    category: category.to_string(),
                });
            }
        }
    }

    let unlabeled: Vec<&String> = configuration
        .identifiers()
        .iter()
        .filter(|id| labels.get(id).is_none())
        .collect();
    if !unlabeled.is_empty() {
        warn!(
            count = unlabeled.len(),
            "Embedded entities without a category label are excluded."
        );
    }
    warnings.extend(
        unlabeled
            .into_iter()
            .map(|id| DispersionWarning::UnlabeledEntity {
                identifier: id.clone(),
            }),
    );

    let coordinates = configuration.coordinates();
    let mut results = Vec::with_capacity(groups.len());
    for (category, mut members) in groups {
        members.sort_unstable();
        let Some(center) = centroid(coordinates, &members) else {
            warnings.push(DispersionWarning::EmptyCategory {
                category: category.to_string(),
            });
            continue;
        };

        let count = members.len();
        let dispersion = if count >= 2 {
            Some(mean_distance_to(coordinates, &members, &center))
        } else {
            match policy.small_groups {
                SmallGroupPolicy::Zero => Some(0.0),
                SmallGroupPolicy::Undefined => {
                    warnings.push(DispersionWarning::UndefinedDispersion {
                        category: category.to_string(),
                        count,
                    });
                    None
                }
            }
        };
        debug!(category, count, ?dispersion, "Category dispersion computed.");

        results.push(DispersionResult {
            category: category.to_string(),
            count,
            centroid: center.iter().copied().collect(),
            dispersion,
        });
    }

    for warning in warnings
        .iter()
        .filter(|w| !matches!(w, DispersionWarning::UnlabeledEntity { .. }))
    {
        warn!("{}", warning);
    }
    info!(
        categories = results.len(),
        warnings = warnings.len(),
        "Dispersion analysis complete."
    );

    Ok(DispersionReport { results, warnings })
}
