////////////////////////////////////////////////////////////////////////////////
// C Preprocessor Macro Expansion Library
// -----------------------------------------------------------------------------
// Description:
// This library implements a C11-compatible macro expander over line-anchored
// directive tables. Given a table of define / undefine / include directives
// and an input character sequence, it produces the fully macro-replaced
// output, following the C11 (Sec 6.10.3) replacement rules for object-like
// and function-like macros: parameter substitution, stringification (`#`),
// token pasting (`##`), variadic parameters (`...` / `__VA_ARGS__`),
// placemarker tokens, and the painted-blue self-recursion discipline.
//
// Features:
// - **Tokenization**: Splits input into C11 preprocessing tokens with
//   whitespace tracking and maximal-munch punctuator recognition.
// - **Directive tables**: Ordered, line-anchored define/undefine/include
//   stores with binary-search lookup and cyclic-include protection.
// - **Definition parsing**: DWARF-style `#define` payload parsing into
//   name, parameter list, and replacement text.
// - **Macro expansion**: The rescan-and-replace loop with blacklist
//   discipline, argument gathering, substitution, and token pasting.
// - **Logging**: Debug-level tracing of expansion decisions throughout.
//
// Modular Design:
// The library is divided into distinct modules, each handling a specific
// aspect of the expansion pipeline. Leaves come first: the tokenizer and
// the directive table know nothing of expansion; the expansion driver in
// `modules::expander` ties them together.
//
// Usage:
// Populate a `MacroTable` with `add_define` / `add_undefine` /
// `add_include`, then call `macro_expand(input, &table, lineno)`.
// -----------------------------------------------------------------------------
////////////////////////////////////////////////////////////////////////////////

pub mod modules {
    pub mod arguments;
    pub mod definition;
    pub mod error;
    pub mod expander;
    pub mod macro_table;
    pub mod paste;
    pub mod substitution;
    pub mod tokenizer;
}
