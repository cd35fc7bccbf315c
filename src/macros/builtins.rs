//! Macros available in every expression.

use super::MacroDefinition;

/// Builtin macro table. User macros from the settings shadow these.
pub static BUILTIN_MACROS: phf::Map<&'static str, MacroDefinition> = phf::phf_map! {
    // Grouping aliases
    "\\bgroup" => MacroDefinition::StaticStr("{"),
    "\\egroup" => MacroDefinition::StaticStr("}"),

    // Active characters
    "~" => MacroDefinition::StaticStr("\\nobreakspace"),

    // Quotes
    "\\lq" => MacroDefinition::StaticStr("`"),
    "\\rq" => MacroDefinition::StaticStr("'"),

    // Relation aliases
    "\\ne" => MacroDefinition::StaticStr("\\neq"),
    "\u{2260}" => MacroDefinition::StaticStr("\\neq"),
    "\\le" => MacroDefinition::StaticStr("\\leq"),
    "\u{2264}" => MacroDefinition::StaticStr("\\leq"),
    "\\ge" => MacroDefinition::StaticStr("\\geq"),
    "\u{2265}" => MacroDefinition::StaticStr("\\geq"),
    "\\to" => MacroDefinition::StaticStr("\\rightarrow"),
    "\\gets" => MacroDefinition::StaticStr("\\leftarrow"),

    // amsmath arrows padded with thick spaces
    "\\iff" => MacroDefinition::StaticStr("\\;\\Longleftrightarrow\\;"),
    "\\implies" => MacroDefinition::StaticStr("\\;\\Longrightarrow\\;"),
    "\\impliedby" => MacroDefinition::StaticStr("\\;\\Longleftarrow\\;"),

    "\\dots" => MacroDefinition::StaticStr("\\ldots"),
    "\\colon" => MacroDefinition::StaticStr("\\mathpunct{:}"),
};
