//! A grammar with a nullable nonterminal, used to exercise FOLLOW-set
//! propagation across an epsilon production: `S -> A b`, `A -> a | @`.

pub fn grammar_text() -> &'static str {
    "\
S | A
a | b
S -> A b
A -> a
A -> @
"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::first_follow::FirstFollow;
    use crate::grammar::loader::GrammarLoader;
    use crate::lr::slr1::Slr1TableBuilder;
    use crate::support::BuildLog;
    use crate::symbol::Symbol;

    #[test]
    fn follow_of_nullable_a_includes_b() {
        let grammar = GrammarLoader::from_text(grammar_text()).unwrap();
        let ff = FirstFollow::compute(&grammar);
        let follow_a = ff.follow_of(&Symbol::nonterminal("A"));
        assert!(follow_a.contains(&Symbol::terminal("b")));
    }

    #[test]
    fn builds_an_slr1_table_despite_the_epsilon_production() {
        let grammar = GrammarLoader::from_text(grammar_text()).unwrap();
        Slr1TableBuilder::build(&grammar, BuildLog::None).unwrap();
    }
}
