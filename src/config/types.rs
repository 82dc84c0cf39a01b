//! Enumerated configuration values: branches, categories and example selection.

use crate::error::{FctError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream branch an archive is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Main,
    Develop,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::Main, Branch::Develop];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Main => "main",
            Branch::Develop => "develop",
        }
    }
}

impl FromStr for Branch {
    type Err = FctError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "main" => Ok(Branch::Main),
            "develop" => Ok(Branch::Develop),
            other => Err(FctError::Config(format!(
                "unfamiliar branch '{}' (expected one of: main, develop)",
                other
            ))),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream example category, named after its subfolder in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "examples_artificial_data")]
    ArtificialData,
    #[serde(rename = "examples_smarteole")]
    Smarteole,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::ArtificialData, Category::Smarteole];

    /// Subfolder name inside the extracted archive.
    pub fn subfolder(self) -> &'static str {
        match self {
            Category::ArtificialData => "examples_artificial_data",
            Category::Smarteole => "examples_smarteole",
        }
    }
}

impl FromStr for Category {
    type Err = FctError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.subfolder() == s)
            .ok_or_else(|| {
                FctError::Config(format!(
                    "unknown example category '{}' (expected one of: examples_artificial_data, examples_smarteole)",
                    s
                ))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subfolder())
    }
}

/// Choice strings offered by the project template for `populate_with_examples`.
const SELECTOR_CHOICES: [(&str, Branch, Category); 4] = [
    (
        "Artificial SCADA data analysis examples from the 'flasc/main' branch",
        Branch::Main,
        Category::ArtificialData,
    ),
    (
        "Artificial SCADA data analysis examples from the 'flasc/develop' branch",
        Branch::Develop,
        Category::ArtificialData,
    ),
    (
        "Smarteole wake steering campaign analysis examples from the 'flasc/main' branch",
        Branch::Main,
        Category::Smarteole,
    ),
    (
        "Smarteole wake steering campaign analysis examples from the 'flasc/develop' branch",
        Branch::Develop,
        Category::Smarteole,
    ),
];

/// What the template asked the hook to populate the project with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleSelection {
    None,
    Examples(Branch, Category),
}

impl ExampleSelection {
    /// Parse the rendered `populate_with_examples` value.
    pub fn parse(selector: &str) -> Result<Self> {
        let selector = selector.trim();
        if matches!(
            selector.to_ascii_lowercase().as_str(),
            "" | "n" | "no" | "none"
        ) {
            return Ok(ExampleSelection::None);
        }

        SELECTOR_CHOICES
            .iter()
            .find(|(choice, _, _)| *choice == selector)
            .map(|&(_, branch, category)| ExampleSelection::Examples(branch, category))
            .ok_or_else(|| {
                let expected: Vec<String> =
                    Self::choices().map(|choice| format!("'{}'", choice)).collect();
                FctError::Config(format!(
                    "unrecognized populate_with_examples value '{}'; expected 'no' or one of: {}",
                    selector,
                    expected.join(", ")
                ))
            })
    }

    /// All choice strings that select examples.
    pub fn choices() -> impl Iterator<Item = &'static str> {
        SELECTOR_CHOICES.iter().map(|(choice, _, _)| *choice)
    }
}
