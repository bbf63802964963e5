// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use crate::models::SkuReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Description,
    Category,
}

impl FilterField {
    fn read<'a>(&self, r: &'a SkuReport) -> &'a str {
        match self {
            FilterField::Description => r.description.as_str(),
            FilterField::Category => r.category.as_deref().unwrap_or(""),
        }
    }
}

/// Which SKUs of a fetched report are shown. Filters never mutate the report and are
/// always evaluated against the full fetched list.
#[derive(Debug, Clone, Default)]
pub enum SkuFilter {
    #[default]
    All,
    /// Description contains "new", any case.
    DescriptionNew,
    /// Category contains "new" or "ng", any case. Missing category reads as "".
    CategoryNewOrNg,
    Pattern { field: FilterField, regex: Regex },
}

impl SkuFilter {
    pub fn pattern(field: FilterField, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(SkuFilter::Pattern { field, regex })
    }

    pub fn matches(&self, r: &SkuReport) -> bool {
        match self {
            SkuFilter::All => true,
            SkuFilter::DescriptionNew => contains_ci(&r.description, "new"),
            SkuFilter::CategoryNewOrNg => {
                let cat = FilterField::Category.read(r);
                contains_ci(cat, "new") || contains_ci(cat, "ng")
            }
            SkuFilter::Pattern { field, regex } => regex.is_match(field.read(r)),
        }
    }

    pub fn apply<'a>(&self, skus: &'a [SkuReport]) -> Vec<&'a SkuReport> {
        skus.iter().filter(|r| self.matches(r)).collect()
    }
}

fn contains_ci(hay: &str, needle: &str) -> bool {
    hay.to_lowercase().contains(needle)
}

impl FromStr for SkuFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(p) = s.strip_prefix("desc:") {
            return SkuFilter::pattern(FilterField::Description, p)
                .map_err(|e| format!("Invalid regex pattern '{}': {}", p, e));
        }
        if let Some(p) = s.strip_prefix("category:") {
            return SkuFilter::pattern(FilterField::Category, p)
                .map_err(|e| format!("Invalid regex pattern '{}': {}", p, e));
        }
        match s.to_lowercase().as_str() {
            "" | "all" | "none" => Ok(SkuFilter::All),
            "new" | "new-description" => Ok(SkuFilter::DescriptionNew),
            "new-category" | "category" | "new|ng" => Ok(SkuFilter::CategoryNewOrNg),
            other => Err(format!(
                "Unknown filter '{}' (use all|new|new-category|desc:<regex>|category:<regex>)",
                other
            )),
        }
    }
}

impl fmt::Display for SkuFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkuFilter::All => f.write_str("all"),
            SkuFilter::DescriptionNew => f.write_str("new"),
            SkuFilter::CategoryNewOrNg => f.write_str("new-category"),
            SkuFilter::Pattern { field, regex } => match field {
                FilterField::Description => write!(f, "desc:{}", regex.as_str()),
                FilterField::Category => write!(f, "category:{}", regex.as_str()),
            },
        }
    }
}
