/*!
 * @file macro_table_tests.rs
 * @brief Integration tests for the line-anchored directive table.
 *
 * @details
 * Lookup windows, undefine shadowing, out-of-order insertion, and include
 * graph traversal (with a deliberate cycle) are exercised through the
 * public `MacroTable` interface.
 */

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use cpp_macro_expander::modules::macro_table::{IncludedMacros, MacroTable};

    /// @test test_lookup_windows
    /// @brief A define is visible strictly after its line; line 0 sees the
    /// final table state.
    #[test]
    fn test_lookup_windows() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "A a");
        macros.add_define(2, "B b");
        macros.add_define(3, "C c");

        assert!(macros.find_define(1, "A").is_none());
        assert_eq!(macros.find_define(2, "A").unwrap().repl, "a");
        assert!(macros.find_define(2, "B").is_none());
        assert_eq!(macros.find_define(3, "B").unwrap().repl, "b");
        // A query line past every entry anchors at the table end.
        assert_eq!(macros.find_define(100, "C").unwrap().repl, "c");
        assert_eq!(macros.find_define(0, "C").unwrap().repl, "c");
        assert!(macros.find_define(0, "missing").is_none());
    }

    /// @test test_redefinition_nearest_wins
    /// @brief The nearest preceding define shadows earlier ones.
    #[test]
    fn test_redefinition_nearest_wins() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "A old");
        macros.add_define(5, "A new");

        assert_eq!(macros.find_define(3, "A").unwrap().repl, "old");
        assert_eq!(macros.find_define(6, "A").unwrap().repl, "new");
        assert_eq!(macros.find_define(0, "A").unwrap().repl, "new");
    }

    /// @test test_undefine_terminates_search
    /// @brief An undefine between the query and the define hides it.
    #[test]
    fn test_undefine_terminates_search() {
        let mut macros = MacroTable::new();
        macros.add_define(1, "x 3");
        macros.add_undefine(3, "x");
        macros.add_define(4, "x 2");

        assert_eq!(macros.find_define(2, "x").unwrap().repl, "3");
        assert_eq!(macros.find_define(3, "x").unwrap().repl, "3");
        assert!(macros.find_define(4, "x").is_none());
        assert_eq!(macros.find_define(0, "x").unwrap().repl, "2");
        // Undefining an unknown name affects nothing else.
        macros.add_undefine(5, "unrelated");
        assert_eq!(macros.find_define(0, "x").unwrap().repl, "2");
    }

    /// @test test_out_of_order_insertion
    /// @brief Entries inserted at earlier lines keep the table sorted.
    #[test]
    fn test_out_of_order_insertion() {
        let mut macros = MacroTable::new();
        macros.add_define(3, "C(x,y,z) A(B(x, y, z))");
        macros.add_define(1, "A(x) #x");
        macros.add_define(2, "B(x,y,z) x, y, z");

        assert_eq!(macros.len(), 3);
        assert!(macros.find_define(1, "A").is_none());
        assert_eq!(macros.find_define(2, "A").unwrap().name, "A");
        assert!(macros.find_define(3, "C").is_none());
        assert_eq!(macros.find_define(4, "C").unwrap().name, "C");
    }

    struct Header<'t> {
        table: MacroTable<'t>,
    }

    impl<'t> IncludedMacros for Header<'t> {
        fn macros(&self) -> &MacroTable<'_> {
            &self.table
        }
    }

    /// @test test_include_chain
    /// @brief Includes are consulted at their line against the included
    /// table's final state, and nest transitively.
    #[test]
    fn test_include_chain() {
        let mut deepest = MacroTable::new();
        deepest.add_define(7, "DEEP deep");
        let deepest = Header { table: deepest };

        let mut inner = MacroTable::new();
        inner.add_define(1, "INNER inner");
        inner.add_include(2, &deepest);
        let inner = Header { table: inner };

        let mut outer = MacroTable::new();
        outer.add_define(1, "A a");
        outer.add_include(4, &inner);

        assert_eq!(outer.find_define(0, "INNER").unwrap().repl, "inner");
        assert_eq!(outer.find_define(0, "DEEP").unwrap().repl, "deep");
        assert_eq!(outer.find_define(5, "DEEP").unwrap().repl, "deep");
        assert!(outer.find_define(4, "INNER").is_none());
        assert!(outer.find_define(0, "missing").is_none());
    }

    /// @test test_local_define_beats_include
    /// @brief A define after the include shadows the included one.
    #[test]
    fn test_local_define_beats_include() {
        let mut inner = MacroTable::new();
        inner.add_define(1, "A included");
        let inner = Header { table: inner };

        let mut outer = MacroTable::new();
        outer.add_include(2, &inner);
        outer.add_define(5, "A local");

        assert_eq!(outer.find_define(4, "A").unwrap().repl, "included");
        assert_eq!(outer.find_define(0, "A").unwrap().repl, "local");
    }

    struct LateBound<'t> {
        table: Cell<Option<&'t MacroTable<'t>>>,
    }

    impl<'t> IncludedMacros for LateBound<'t> {
        fn macros(&self) -> &MacroTable<'_> {
            self.table.get().expect("include target not bound")
        }
    }

    /// @test test_cyclic_includes
    /// @brief A cyclic include graph terminates and still resolves names
    /// reachable before the cycle closes.
    #[test]
    fn test_cyclic_includes() {
        let provider = LateBound { table: Cell::new(None) };
        let mut macros = MacroTable::new();
        macros.add_define(1, "A a");
        macros.add_include(2, &provider);
        macros.add_define(3, "B b");
        provider.table.set(Some(&macros));

        assert_eq!(macros.find_define(0, "A").unwrap().repl, "a");
        assert_eq!(macros.find_define(0, "B").unwrap().repl, "b");
        assert!(macros.find_define(0, "missing").is_none());
        // Lookups stay usable after traversing the cycle.
        assert_eq!(macros.find_define(0, "A").unwrap().repl, "a");
    }
}
