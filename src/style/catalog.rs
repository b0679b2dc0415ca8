// src/style/catalog.rs
//! The static table of tunable clang-format keys and the values to try.

use super::{BaseStyle, Overrides, BASE_KEY};
use serde_yaml::{Mapping, Value};

/// Keys that are never proposed: they pick the language, disable
/// formatting, or only matter for macros and non-C languages.
pub const SKIPPED_KEYS: &[&str] = &[
    "Language",
    "CommentPragmas",
    "DisableFormat",
    "ForEachMacros",
    "JavaScriptQuotes",
    "JavaScriptWrapImports",
    "MacroBlockEnd",
    "MacroBlockBegin",
    "BreakAfterJavaFieldAnnotations",
];

pub const INDENT_WIDTH_KEY: &str = "IndentWidth";
pub const USE_TAB_KEY: &str = "UseTab";
pub const TAB_WIDTH_KEY: &str = "TabWidth";

const BOOLEAN_KEYS: &[&str] = &[
    "AlignConsecutiveAssignments",
    "AlignConsecutiveDeclarations",
    "AlignEscapedNewlinesLeft",
    "AlignOperands",
    "AlignTrailingComments",
    "AllowAllParametersOfDeclarationOnNextLine",
    "AllowShortBlocksOnASingleLine",
    "AllowShortCaseLabelsOnASingleLine",
    "AllowShortIfStatementsOnASingleLine",
    "AllowShortLoopsOnASingleLine",
    "AlwaysBreakBeforeMultilineStrings",
    "AlwaysBreakTemplateDeclarations",
    "BinPackArguments",
    "BinPackParameters",
    "BreakBeforeTernaryOperators",
    "BreakConstructorInitializersBeforeComma",
    "BreakStringLiterals",
    "ConstructorInitializerAllOnOneLineOrOnePerLine",
    "Cpp11BracedListStyle",
    "DerivePointerAlignment",
    "ExperimentalAutoDetectBinPacking",
    "IndentCaseLabels",
    "IndentWrappedFunctionNames",
    "KeepEmptyLinesAtTheStartOfBlocks",
    "ObjCSpaceAfterProperty",
    "ObjCSpaceBeforeProtocolList",
    "ReflowComments",
    "SortIncludes",
    "SpaceAfterCStyleCast",
    "SpaceAfterTemplateKeyword",
    "SpaceBeforeAssignmentOperators",
    "SpaceInEmptyParentheses",
    "SpacesInAngles",
    "SpacesInContainerLiterals",
    "SpacesInCStyleCastParentheses",
    "SpacesInParentheses",
    "SpacesInSquareBrackets",
];

const INTEGER_KEYS: &[(&str, &[i64])] = &[
    ("AccessModifierOffset", &[-4, -2, -1, 0, 1, 2, 4]),
    ("ColumnLimit", &[0, 80, 90, 100, 110, 120]),
    ("ConstructorInitializerIndentWidth", &[0, 2, 4]),
    ("ContinuationIndentWidth", &[0, 2, 4]),
    (INDENT_WIDTH_KEY, &[2, 3, 4, 8]),
    ("MaxEmptyLinesToKeep", &[0, 1, 2, 3, 4]),
    ("ObjCBlockIndentWidth", &[0, 2, 4]),
    ("PenaltyBreakBeforeFirstCallParameter", &[1, 19]),
    ("PenaltyBreakComment", &[300, 150]),
    ("PenaltyBreakFirstLessLess", &[120, 60]),
    ("PenaltyBreakString", &[1000, 500]),
    ("PenaltyExcessCharacter", &[1_000_000, 500_000]),
    ("PenaltyReturnTypeOnItsOwnLine", &[200, 60]),
    ("SpacesBeforeTrailingComments", &[1, 2]),
];

const ENUM_KEYS: &[(&str, &[&str])] = &[
    ("AlignAfterOpenBracket", &["Align", "DontAlign", "AlwaysBreak"]),
    ("AllowShortFunctionsOnASingleLine", &["All", "Inline", "None", "Empty"]),
    ("AlwaysBreakAfterDefinitionReturnType", &["TopLevel", "None"]),
    ("AlwaysBreakAfterReturnType", &["None", "TopLevelDefinitions"]),
    ("BreakBeforeBinaryOperators", &["None", "NonAssignment", "All"]),
    (
        "BreakBeforeBraces",
        &["GNU", "Allman", "Mozilla", "Attach", "Stroustrup", "Linux", "WebKit"],
    ),
    ("IncludeIsMainRegex", &["$", "([-_](test|unittest))?$"]),
    ("NamespaceIndentation", &["All", "None", "Inner"]),
    ("PointerAlignment", &["Middle", "Right", "Left"]),
    ("SpaceBeforeParens", &["Always", "Never", "ControlStatements"]),
    ("Standard", &["Cpp11", "Cpp03", "Auto"]),
];

const USE_TAB_PAIRS: &[(&str, i64)] = &[
    ("Never", 8),
    ("ForIndentation", 4),
    ("ForIndentation", 8),
    ("Always", 4),
    ("Always", 8),
];

/// `(regex, priority)` groups for the two include orderings worth trying.
const INCLUDE_CATEGORIES: &[&[(&str, i64)]] = &[
    &[
        (r#"^"(llvm|llvm-c|clang|clang-c)/"#, 2),
        (r#"^(<|"(gtest|isl|json)/)"#, 3),
        (".*", 1),
    ],
    &[(r"^<.*\.h>", 1), ("^<.*", 2), (".*", 3)],
];

/// A tunable key and the candidate override sets to try for it.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOption {
    pub name: String,
    pub candidates: Vec<Overrides>,
}

impl StyleOption {
    fn single<V: Into<Value> + Copy>(name: &str, values: &[V]) -> Self {
        Self {
            name: name.to_string(),
            candidates: values
                .iter()
                .map(|v| Overrides::new().with(name, *v))
                .collect(),
        }
    }
}

/// One candidate per base preset, in preset order.
#[must_use]
pub fn base_candidates(bases: &[BaseStyle]) -> Vec<Overrides> {
    bases
        .iter()
        .map(|b| Overrides::new().with(BASE_KEY, b.as_str()))
        .collect()
}

/// Every tunable key with its candidates, sorted by key name.
///
/// Base presets are not part of the table; see [`base_candidates`].
#[must_use]
pub fn catalog() -> Vec<StyleOption> {
    let mut options: Vec<StyleOption> = BOOLEAN_KEYS
        .iter()
        .map(|k| StyleOption::single(k, &[true, false]))
        .collect();

    options.extend(INTEGER_KEYS.iter().map(|(k, vs)| StyleOption::single(k, *vs)));
    options.extend(ENUM_KEYS.iter().map(|(k, vs)| StyleOption::single(k, *vs)));

    options.push(include_categories());
    options.push(StyleOption {
        name: USE_TAB_KEY.to_string(),
        candidates: USE_TAB_PAIRS
            .iter()
            .map(|(mode, width)| {
                Overrides::new()
                    .with(USE_TAB_KEY, *mode)
                    .with(TAB_WIDTH_KEY, *width)
            })
            .collect(),
    });

    options.retain(|o| !SKIPPED_KEYS.contains(&o.name.as_str()));
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

/// Looks up one catalog entry by key.
#[must_use]
pub fn option(key: &str) -> Option<StyleOption> {
    catalog().into_iter().find(|o| o.name == key)
}

fn include_categories() -> StyleOption {
    let candidates = INCLUDE_CATEGORIES
        .iter()
        .map(|groups| {
            let list: Vec<Value> = groups
                .iter()
                .map(|(regex, priority)| {
                    let mut m = Mapping::new();
                    m.insert("Regex".into(), (*regex).into());
                    m.insert("Priority".into(), (*priority).into());
                    Value::Mapping(m)
                })
                .collect();
            Overrides::new().with("IncludeCategories", Value::Sequence(list))
        })
        .collect();

    StyleOption {
        name: "IncludeCategories".to_string(),
        candidates,
    }
}
