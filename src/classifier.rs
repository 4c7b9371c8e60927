//! Error-message inference for undetermined `expectError` placeholders.
//!
//! The classifier is an ordered rule table over the scenario's natural-language
//! fields and its document path. Rules are evaluated top to bottom and the
//! first match wins; nothing is combined or scored. Enumeration-violation
//! rules sit above the generic "validation"/"error" outcome rules because an
//! invalid-value scenario usually also says "error" in its `then` text.

pub const ACTION_ENUM_MESSAGE: &str =
    "action must be one of: update_field, open_url, trigger_automation";
pub const FORMAT_ENUM_MESSAGE: &str = "must match one of the allowed format values";
pub const STYLE_ENUM_MESSAGE: &str = "must be a valid style option";
pub const AGGREGATION_ENUM_MESSAGE: &str = "must be one of: sum, avg, count, min, max, string_agg";
pub const GENERIC_ENUM_MESSAGE: &str = "must be one of the allowed values";
pub const URL_FORMAT_MESSAGE: &str = "must be a valid URL format";
pub const EMAIL_FORMAT_MESSAGE: &str = "must be a valid email format";
pub const PHONE_FORMAT_MESSAGE: &str = "must be a valid phone number format";
pub const PATTERN_MESSAGE: &str = "must match the required pattern";
pub const TYPE_MESSAGE: &str = "must be of the correct type";
pub const REQUIRED_MESSAGE: &str = "is required and cannot be null or empty";
pub const RANGE_MESSAGE: &str = "must be within the allowed range";
pub const LENGTH_MESSAGE: &str = "must meet length requirements";
pub const SCHEMA_MESSAGE: &str = "must conform to the defined schema";
/// Used when no rule matches.
pub const FALLBACK_MESSAGE: &str = "validation error";

/// Identifier of the rule that produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    EnumAction,
    EnumFormat,
    EnumStyle,
    EnumAggregation,
    EnumUrl,
    EnumEmail,
    EnumPhone,
    EnumGeneric,
    PatternUrl,
    PatternEmail,
    PatternPhone,
    PatternGeneric,
    TypeMismatch,
    Required,
    Range,
    Length,
    SchemaConformance,
}

impl RuleId {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::EnumAction => "enum_action",
            RuleId::EnumFormat => "enum_format",
            RuleId::EnumStyle => "enum_style",
            RuleId::EnumAggregation => "enum_aggregation",
            RuleId::EnumUrl => "enum_url",
            RuleId::EnumEmail => "enum_email",
            RuleId::EnumPhone => "enum_phone",
            RuleId::EnumGeneric => "enum_generic",
            RuleId::PatternUrl => "pattern_url",
            RuleId::PatternEmail => "pattern_email",
            RuleId::PatternPhone => "pattern_phone",
            RuleId::PatternGeneric => "pattern_generic",
            RuleId::TypeMismatch => "type_mismatch",
            RuleId::Required => "required",
            RuleId::Range => "range",
            RuleId::Length => "length",
            RuleId::SchemaConformance => "schema_conformance",
        }
    }
}

/// Text the rules look at. Scenario text is case-folded; the document path
/// and field name are matched as written.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSignals {
    given: String,
    when: String,
    then: String,
    path: String,
    field_name: String,
}

impl ScenarioSignals {
    pub fn new(given: &str, when: &str, then: &str, path: &str, field_name: &str) -> Self {
        Self {
            given: given.to_lowercase(),
            when: when.to_lowercase(),
            then: then.to_lowercase(),
            path: path.to_string(),
            field_name: field_name.to_string(),
        }
    }

    fn mentions_invalid(&self) -> bool {
        self.given.contains("invalid") || self.when.contains("invalid")
    }

    fn reports_failure(&self) -> bool {
        self.then_has_any(&["validation", "error"])
    }

    fn then_has_any(&self, words: &[&str]) -> bool {
        words.iter().any(|word| self.then.contains(word))
    }

    fn path_has(&self, word: &str) -> bool {
        self.path.contains(word)
    }

    fn subject_has(&self, word: &str) -> bool {
        self.path_has(word) || self.field_name.contains(word)
    }

    fn reports_format_failure(&self) -> bool {
        self.reports_failure() && self.then_has_any(&["pattern", "format"])
    }
}

struct Rule {
    id: RuleId,
    applies: fn(&ScenarioSignals) -> bool,
    message: &'static str,
}

static RULES: &[Rule] = &[
    Rule {
        id: RuleId::EnumAction,
        applies: enum_action,
        message: ACTION_ENUM_MESSAGE,
    },
    Rule {
        id: RuleId::EnumFormat,
        applies: enum_format,
        message: FORMAT_ENUM_MESSAGE,
    },
    Rule {
        id: RuleId::EnumStyle,
        applies: enum_style,
        message: STYLE_ENUM_MESSAGE,
    },
    Rule {
        id: RuleId::EnumAggregation,
        applies: enum_aggregation,
        message: AGGREGATION_ENUM_MESSAGE,
    },
    Rule {
        id: RuleId::EnumUrl,
        applies: enum_url,
        message: URL_FORMAT_MESSAGE,
    },
    Rule {
        id: RuleId::EnumEmail,
        applies: enum_email,
        message: EMAIL_FORMAT_MESSAGE,
    },
    Rule {
        id: RuleId::EnumPhone,
        applies: enum_phone,
        message: PHONE_FORMAT_MESSAGE,
    },
    Rule {
        id: RuleId::EnumGeneric,
        applies: ScenarioSignals::mentions_invalid,
        message: GENERIC_ENUM_MESSAGE,
    },
    Rule {
        id: RuleId::PatternUrl,
        applies: pattern_url,
        message: URL_FORMAT_MESSAGE,
    },
    Rule {
        id: RuleId::PatternEmail,
        applies: pattern_email,
        message: EMAIL_FORMAT_MESSAGE,
    },
    Rule {
        id: RuleId::PatternPhone,
        applies: pattern_phone,
        message: PHONE_FORMAT_MESSAGE,
    },
    Rule {
        id: RuleId::PatternGeneric,
        applies: ScenarioSignals::reports_format_failure,
        message: PATTERN_MESSAGE,
    },
    Rule {
        id: RuleId::TypeMismatch,
        applies: type_mismatch,
        message: TYPE_MESSAGE,
    },
    Rule {
        id: RuleId::Required,
        applies: required,
        message: REQUIRED_MESSAGE,
    },
    Rule {
        id: RuleId::Range,
        applies: range,
        message: RANGE_MESSAGE,
    },
    Rule {
        id: RuleId::Length,
        applies: length,
        message: LENGTH_MESSAGE,
    },
    Rule {
        id: RuleId::SchemaConformance,
        applies: schema_conformance,
        message: SCHEMA_MESSAGE,
    },
];

fn enum_action(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.subject_has("action")
}

fn enum_format(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.subject_has("format")
}

fn enum_style(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.subject_has("style")
}

fn enum_aggregation(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.path_has("aggregation")
}

fn enum_url(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.path_has("url")
}

fn enum_email(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.path_has("email")
}

fn enum_phone(s: &ScenarioSignals) -> bool {
    s.mentions_invalid() && s.path_has("phone")
}

fn pattern_url(s: &ScenarioSignals) -> bool {
    s.reports_format_failure() && s.path_has("url")
}

fn pattern_email(s: &ScenarioSignals) -> bool {
    s.reports_format_failure() && s.path_has("email")
}

fn pattern_phone(s: &ScenarioSignals) -> bool {
    s.reports_format_failure() && s.path_has("phone")
}

fn type_mismatch(s: &ScenarioSignals) -> bool {
    s.reports_failure() && s.then_has_any(&["type"])
}

fn required(s: &ScenarioSignals) -> bool {
    s.reports_failure() && s.then_has_any(&["required"])
}

fn range(s: &ScenarioSignals) -> bool {
    s.reports_failure() && s.then_has_any(&["minimum", "maximum"])
}

fn length(s: &ScenarioSignals) -> bool {
    s.reports_failure() && s.then_has_any(&["length"])
}

fn schema_conformance(s: &ScenarioSignals) -> bool {
    s.then.contains("schema") && s.then.contains("validation")
}

/// Outcome of classifying one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub message: &'static str,
    /// `None` when the fallback message was used.
    pub rule: Option<RuleId>,
}

impl Classification {
    pub fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

pub fn classify(signals: &ScenarioSignals) -> Classification {
    RULES
        .iter()
        .find(|rule| (rule.applies)(signals))
        .map(|rule| Classification {
            message: rule.message,
            rule: Some(rule.id),
        })
        .unwrap_or(Classification {
            message: FALLBACK_MESSAGE,
            rule: None,
        })
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
