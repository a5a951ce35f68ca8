//! @file macro_table.rs
//! @brief Line-anchored directive tables with include resolution.
//!
//! @details
//! A `MacroTable` is an ordered sequence of define / undefine / include
//! entries sorted by source line (stable among equal lines). Entries are
//! never mutated after insertion. Appending at non-decreasing line numbers
//! is the expected usage and stays O(1); an out-of-order insert shifts
//! later entries to preserve order.
//!
//! Lookup walks backwards from the query line: the nearest matching define
//! wins, a nearer matching undefine shadows it, and include entries are
//! searched against the final state of the included table. A per-table
//! `in_use` mark makes lookups through cyclic include graphs terminate.

use std::cell::Cell;

use super::definition::Definition;
use log::debug;

/// Provider of an included directive table.
///
/// An include entry does not own the table it references; the provider is
/// whatever longer-lived object (a compilation unit, a header record)
/// carries it.
pub trait IncludedMacros {
    fn macros(&self) -> &MacroTable<'_>;
}

/// One directive, tagged by kind.
///
/// # Variants
/// * `Define` - Introduces a macro definition, owned inline.
/// * `Undefine` - Removes a name from that line onward.
/// * `Include` - Splices another table's directives in at this line.
pub enum Directive<'a> {
    Define(Definition),
    Undefine(String),
    Include(&'a dyn IncludedMacros),
}

struct Entry<'a> {
    lineno: u32,
    directive: Directive<'a>,
}

/// Ordered store of directives with line-anchored lookup.
pub struct MacroTable<'a> {
    entries: Vec<Entry<'a>>,
    in_use: Cell<bool>,
}

// Clears the in-use mark on every exit path of a lookup.
struct InUseGuard<'t>(&'t Cell<bool>);

impl Drop for InUseGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<'a> MacroTable<'a> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            in_use: Cell::new(false),
        }
    }

    /// Number of recorded directives.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no directives.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Inserts keeping entries ordered by line, stable among equal lines.
    // Appending in non-decreasing line order is the fast path.
    fn insert_entry(&mut self, entry: Entry<'a>) {
        if self.entries.last().map_or(true, |e| e.lineno <= entry.lineno) {
            self.entries.push(entry);
            return;
        }
        let index = self.entries.partition_point(|e| e.lineno <= entry.lineno);
        self.entries.insert(index, entry);
    }

    /// Records a `#define` directive at `lineno`.
    ///
    /// # Arguments
    /// * `lineno` - Source line of the directive (1-based).
    /// * `def` - The definition string with `#define ` already stripped,
    ///   in the format accepted by `Definition::parse`.
    pub fn add_define(&mut self, lineno: u32, def: &str) {
        debug!("add_define: line {} def {:?}", lineno, def);
        self.insert_entry(Entry {
            lineno,
            directive: Directive::Define(Definition::parse(def)),
        });
    }

    /// Records an `#undef` directive at `lineno`.
    pub fn add_undefine(&mut self, lineno: u32, name: &str) {
        debug!("add_undefine: line {} name {}", lineno, name);
        self.insert_entry(Entry {
            lineno,
            directive: Directive::Undefine(name.to_string()),
        });
    }

    /// Records an include of another table at `lineno`.
    ///
    /// The included table is not owned; `included` must outlive this table
    /// (or the caller must otherwise keep the reference valid).
    pub fn add_include(&mut self, lineno: u32, included: &'a dyn IncludedMacros) {
        debug!("add_include: line {}", lineno);
        self.insert_entry(Entry {
            lineno,
            directive: Directive::Include(included),
        });
    }

    /// Looks up the definition of `name` active at `lineno`.
    ///
    /// A `lineno` of 0 queries the final state of the table. Otherwise only
    /// directives on earlier lines are considered. Walking backwards from
    /// the anchor: a matching define is returned, a matching undefine ends
    /// the search with no result, and an include is searched recursively
    /// against the full included table.
    ///
    /// Re-entering a table already engaged in a lookup (a cyclic include
    /// graph) returns `None` rather than recursing forever.
    ///
    /// # Returns
    /// * `Some(&Definition)` of the nearest active define, or `None`.
    pub fn find_define(&self, lineno: u32, name: &str) -> Option<&Definition> {
        if self.in_use.get() || self.entries.is_empty() {
            return None;
        }
        self.in_use.set(true);
        let _guard = InUseGuard(&self.in_use);

        // Anchor at the first entry not strictly before the query line;
        // line 0 anchors past the end.
        let anchor = if lineno > 0 {
            self.entries.partition_point(|e| e.lineno < lineno)
        } else {
            self.entries.len()
        };

        // Examine entries from the next smaller index downwards.
        for entry in self.entries[..anchor].iter().rev() {
            match &entry.directive {
                Directive::Define(def) => {
                    if def.name == name {
                        debug!("find_define: {} found at line {}", name, entry.lineno);
                        return Some(def);
                    }
                }
                Directive::Undefine(undef) => {
                    if undef == name {
                        debug!("find_define: {} undefined at line {}", name, entry.lineno);
                        return None;
                    }
                }
                Directive::Include(included) => {
                    if let Some(def) = included.macros().find_define(0, name) {
                        return Some(def);
                    }
                }
            }
        }
        None
    }
}

impl<'a> Default for MacroTable<'a> {
    fn default() -> Self {
        Self::new()
    }
}
