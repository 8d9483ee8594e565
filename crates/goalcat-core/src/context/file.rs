//! Rules document
//!
//! Context rules and time-slot vocabulary are configuration, loaded and
//! validated once. Rules keep the order in which they are declared.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GoalcatError, Result};
use crate::taxonomy::{Category, Subcategory};
use crate::timeslot::TimeSlotRules;

use super::{ContextRule, ContextSplit, IndicatorSet, ItemDomain, PurchaseIntent, RuleBook, RuleSet, SplitSide};

/// Rules shipped with the crate
pub const BUILTIN_RULES: &str = include_str!("../../data/rules.toml");

pub const SUPPORTED_RULES_VERSIONS: &[&str] = &["1"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesFile {
    pub version: String,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleSpec>,
    pub time_slot: TimeSlotSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    PurchaseIntent {
        name: String,
        purchase: Vec<String>,
        necessity: Vec<String>,
        lifestyle: Vec<String>,
        #[serde(default, rename = "item")]
        items: Vec<ItemSpec>,
    },
    ContextSplit {
        name: String,
        #[serde(default)]
        skip_after_purchase: bool,
        trigger: Vec<String>,
        #[serde(rename = "side")]
        sides: Vec<SideSpec>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub category: String,
    /// Shopping subcategory when neither need nor desire is stated
    pub default: String,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideSpec {
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotSpec {
    pub morning_hours: [u32; 2],
    pub morning_words: Vec<String>,
    pub wake_words: Vec<String>,
    pub gym_hours: Vec<[u32; 2]>,
    pub activity_words: Vec<String>,
}

impl RulesFile {
    pub fn parse(content: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(content)?;
        if !SUPPORTED_RULES_VERSIONS.contains(&file.version.as_str()) {
            return Err(GoalcatError::UnsupportedVersion {
                document: "rules".to_string(),
                version: file.version,
                supported: SUPPORTED_RULES_VERSIONS.join(", "),
            });
        }
        Ok(file)
    }

    /// Resolve names against the taxonomy and build the rule book
    pub fn into_rule_book(self) -> Result<RuleBook> {
        let mut rules = Vec::with_capacity(self.rules.len());
        let mut names: Vec<String> = Vec::new();

        for spec in self.rules {
            let rule = spec.build()?;
            if names.iter().any(|n| n == rule.name()) {
                return Err(invalid(rule.name(), "duplicate rule name"));
            }
            names.push(rule.name().to_string());
            rules.push(rule);
        }

        Ok(RuleBook {
            context: RuleSet::new(rules),
            time_slot: self.time_slot.build()?,
        })
    }
}

impl RuleSpec {
    fn build(self) -> Result<ContextRule> {
        match self {
            RuleSpec::PurchaseIntent {
                name,
                purchase,
                necessity,
                lifestyle,
                items,
            } => {
                if purchase.is_empty() {
                    return Err(invalid(&name, "purchase word list is empty"));
                }
                let items = items
                    .into_iter()
                    .map(|item| {
                        Ok(ItemDomain {
                            category: category(&name, &item.category)?,
                            default_subcategory: subcategory(
                                &name,
                                Category::Shopping,
                                &item.default,
                            )?,
                            items: IndicatorSet::new(&item.words),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(ContextRule::PurchaseIntent(PurchaseIntent {
                    necessities: subcategory(&name, Category::Shopping, "necessities")?,
                    lifestyle_subcategory: subcategory(&name, Category::Shopping, "lifestyle")?,
                    purchase: IndicatorSet::new(&purchase),
                    necessity: IndicatorSet::new(&necessity),
                    lifestyle: IndicatorSet::new(&lifestyle),
                    items,
                    name,
                }))
            }
            RuleSpec::ContextSplit {
                name,
                skip_after_purchase,
                trigger,
                sides,
            } => {
                if trigger.is_empty() {
                    return Err(invalid(&name, "trigger word list is empty"));
                }
                let sides: Vec<SplitSide> = sides
                    .into_iter()
                    .map(|side| side.build(&name))
                    .collect::<Result<_>>()?;
                let sides: [SplitSide; 2] = sides.try_into().map_err(|v: Vec<SplitSide>| {
                    invalid(&name, &format!("expected 2 sides, found {}", v.len()))
                })?;

                Ok(ContextRule::Split(ContextSplit {
                    trigger: IndicatorSet::new(&trigger),
                    sides,
                    skip_after_purchase,
                    name,
                }))
            }
        }
    }
}

impl SideSpec {
    fn build(self, rule: &str) -> Result<SplitSide> {
        let category = category(rule, &self.category)?;
        let subcategory = match &self.subcategory {
            Some(sub) => Some(subcategory(rule, category, sub)?),
            None => None,
        };
        Ok(SplitSide {
            context: IndicatorSet::new(&self.context),
            category,
            subcategory,
        })
    }
}

impl TimeSlotSpec {
    fn build(self) -> Result<TimeSlotRules> {
        let range = |[start, end]: [u32; 2]| {
            if start > end || end > 23 {
                Err(invalid(
                    "time_slot",
                    &format!("invalid hour range {}-{}", start, end),
                ))
            } else {
                Ok(start..=end)
            }
        };

        Ok(TimeSlotRules {
            morning_hours: range(self.morning_hours)?,
            morning_words: self
                .morning_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            wake_words: IndicatorSet::new(&self.wake_words),
            gym_hours: self
                .gym_hours
                .into_iter()
                .map(range)
                .collect::<Result<_>>()?,
            activity_words: IndicatorSet::new(&self.activity_words),
            sleep: subcategory("time_slot", Category::Health, "sleep")?,
            sport: subcategory("time_slot", Category::Health, "sport")?,
        })
    }
}

impl RuleBook {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        RulesFile::parse(content)?.into_rule_book()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let file = RulesFile::parse(&content).map_err(|e| match e {
            GoalcatError::TomlDe(e) => GoalcatError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            other => other,
        })?;
        file.into_rule_book()
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_RULES)
    }
}

fn invalid(rule: &str, reason: &str) -> GoalcatError {
    GoalcatError::InvalidRule {
        rule: rule.to_string(),
        reason: reason.to_string(),
    }
}

fn category(rule: &str, name: &str) -> Result<Category> {
    name.parse().map_err(|e: String| invalid(rule, &e))
}

fn subcategory(rule: &str, category: Category, name: &str) -> Result<Subcategory> {
    category.subcategory(name).ok_or_else(|| {
        invalid(
            rule,
            &format!("subcategory '{}' is not allowed under '{}'", name, category),
        )
    })
}
