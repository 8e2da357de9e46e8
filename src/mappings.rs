//! Canonical column rules for the historical LCA disclosure schemas.
//!
//! Disclosure files were published for years under shifting column names:
//! renamed fields, spaced variants, numbered duplicates. The tables below
//! enumerate the known drift as data. [`ALIAS_RULES`] is evaluated strictly
//! in declared order; later rules may target a name an earlier rule
//! introduced, so the order is part of the contract.

/// One (preferred, legacy) column-name pair. When both columns are present
/// the preferred name wins per record and the legacy column is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasRule {
    pub preferred: &'static str,
    pub legacy: &'static str,
}

/// Split rule for a compound "Last, First" column.
#[derive(Debug, Clone, Copy)]
pub struct NameSplitRule {
    pub source: &'static str,
    pub last: &'static str,
    pub first: &'static str,
}

pub const AGENT_ATTORNEY_SPLIT: NameSplitRule = NameSplitRule {
    source: "AGENT_ATTORNEY_NAME",
    last: "AGENT_ATTORNEY_LAST_NAME",
    first: "AGENT_ATTORNEY_FIRST_NAME",
};

pub const ALIAS_RULES: &[AliasRule] = &[
    AliasRule { preferred: "TOTAL_WORKERS", legacy: "TOTAL WORKERS" },
    AliasRule { preferred: "H-1B_DEPENDENT", legacy: "H1B_DEPENDENT" },
    AliasRule { preferred: "H-1B_DEPENDENT", legacy: "H_1B_DEPENDENT" },
    AliasRule { preferred: "EMPLOYMENT_END_DATE", legacy: "END_DATE" },
    AliasRule { preferred: "EMPLOYMENT_START_DATE", legacy: "START_DATE" },
    AliasRule { preferred: "EMPLOYMENT_START_DATE", legacy: "BEGIN_DATE" },
    AliasRule { preferred: "EMPLOYMENT_START_DATE", legacy: "PERIOD_OF_EMPLOYMENT_START_DATE" },
    AliasRule { preferred: "NEW_CONCURRENT_EMPLOYMENT", legacy: "NEW_CONCURRENT_EMP" },
    AliasRule { preferred: "NAICS_CODE", legacy: "NAIC_CODE" },
    AliasRule { preferred: "EMPLOYER_ADDRESS1", legacy: "EMPLOYER_ADDRESS" },
    AliasRule { preferred: "EMPLOYER_POC_ADDRESS_1", legacy: "EMPLOYER_POC_ADDRESS1" },
    AliasRule { preferred: "EMPLOYER_POC_ADDRESS_2", legacy: "EMPLOYER_POC_ADDRESS2" },
    AliasRule { preferred: "EMPLOYMENT_END_DATE", legacy: "PERIOD_OF_EMPLOYMENT_END_DATE" },
    AliasRule { preferred: "PW_OTHER_SOURCE", legacy: "PW_OTHER_SOURCE_1" },
    AliasRule { preferred: "PW_SURVEY_NAME", legacy: "PW_SURVEY_NAME_1" },
    AliasRule { preferred: "PW_OES_YEAR", legacy: "PW_OES_YEAR_1" },
    AliasRule { preferred: "PW_NON-OES_YEAR", legacy: "PW_NON-OES_YEAR_1" },
    AliasRule { preferred: "PREVAILING_WAGE", legacy: "PREVAILING_WAGE_1" },
    AliasRule { preferred: "PW_UNIT_OF_PAY", legacy: "PW_UNIT_OF_PAY_1" },
    AliasRule { preferred: "WAGE_RATE_OF_PAY_FROM", legacy: "WAGE_RATE_OF_PAY_FROM_1" },
    AliasRule { preferred: "WAGE_RATE_OF_PAY_TO", legacy: "WAGE_RATE_OF_PAY_TO_1" },
    AliasRule { preferred: "PW_TRACKING_NUMBER", legacy: "PW_TRACKING_NUMBER_1" },
    AliasRule { preferred: "PW_WAGE_LEVEL", legacy: "PW_WAGE_LEVEL_1" },
    AliasRule { preferred: "PW_SURVEY_PUBLISHER", legacy: "PW_SURVEY_PUBLISHER_1" },
    AliasRule { preferred: "SECONDARY_ENTITY", legacy: "SECONDARY_ENTITY_1" },
    AliasRule { preferred: "SECONDARY_ENTITY_BUSINESS_NAME", legacy: "SECONDARY_ENTITY_BUSINESS_NAME_1" },
];

/// Columns whose name contains one of these fragments get title casing.
pub const TITLE_CASE_KEYWORDS: &[&str] =
    &["ADDRESS", "CITY", "COUNTRY", "NAME", "PROVINCE", "TITLE"];

/// Explicitly title-cased columns the keyword match does not cover.
pub const TITLE_CASE_COLUMNS: &[&str] = &[
    "STATUTORY_BASIS",
    "AGENT_REPRESENTING_EMPLOYER",
    "EMPLOYER_BUSINESS_DBA",
];

pub const EMAIL_KEYWORD: &str = "EMAIL";

/// State and middle-initial columns are uppercased, except the court name.
pub const UPPER_CASE_KEYWORDS: &[&str] = &["STATE", "INITIAL"];
pub const UPPER_CASE_EXCEPTION: &str = "NAME_OF_HIGHEST_STATE_COURT";

pub const DATE_KEYWORDS: &[&str] = &["DATE", "YEAR"];
pub const DATE_COLUMNS: &[&str] = &["CASE_SUBMITTED"];

pub const PHONE_KEYWORD: &str = "PHONE";
pub const PHONE_EXTENSION_KEYWORD: &str = "PHONE_EXT";

pub const NUMERIC_KEYWORDS: &[&str] = &["WORKSITE_WORKERS", "TRACKING_NUMBER", "PHONE_EXT"];

/// Count and code columns coerced to numbers by exact name.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "NAICS_CODE",
    "CHANGE_EMPLOYER",
    "CHANGE_PREVIOUS_EMPLOYMENT",
    "CONTINUED_EMPLOYMENT",
    "AMENDED_PETITION",
    "NEW_CONCURRENT_EMPLOYMENT",
    "PUBLIC_DISCLOSURE_LOCATION",
    "PW_SOURCE",
    "PW_SOURCE_OTHER",
    "TOTAL_WORKER_POSITIONS",
    "TOTAL_WORKSITE_LOCATIONS",
    "TOTAL_WORKERS",
];

/// Flag columns normalized to booleans. Both dependent-employer spellings
/// are listed because cleaning runs per batch, before alias reconciliation.
pub const BOOLEAN_COLUMNS: &[&str] = &[
    "H1B_DEPENDENT",
    "H-1B_DEPENDENT",
    "WILLFUL_VIOLATOR",
    "SUPPORT_H1B",
    "FULL_TIME_POSITION",
    "LABOR_CON_AGREE",
    "AGENT_REPRESENTING_EMPLOYER",
];

/// Wage and rate columns carry a `#` marker for "not meaningful".
pub const CURRENCY_KEYWORDS: &[&str] = &["RATE", "WAGE"];
pub const CURRENCY_SENTINEL: char = '#';

pub const EMPLOYER_NAME_COLUMN: &str = "EMPLOYER_NAME";
pub const PARENT_EMPLOYER_COLUMN: &str = "PARENT_EMPLOYER_NAME";

/// Unique business key each filing is upserted under.
pub const CASE_NUMBER_COLUMN: &str = "CASE_NUMBER";
