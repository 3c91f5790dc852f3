//! Property tests over group arithmetic

use proptest::prelude::*;

use wildmarch::core::types::FightOutcome;
use wildmarch::group::Group;

prop_compose! {
    fn arb_group(name: &'static str)
        (children in 0u32..20, adults in 1u32..20,
         tools in 0u32..60, food in 0u32..60, morale in 0u32..=100)
        -> Group
    {
        Group::new(name, Some("clan"), children, adults, tools, food, morale).unwrap()
    }
}

proptest! {
    #[test]
    fn unite_conserves_people_and_stock(mut a in arb_group("a"), mut b in arb_group("b")) {
        let people = a.size() + b.size();
        let tools = a.tools() + b.tools();
        let food = a.food() + b.food();
        if a.unite(&mut b, people) {
            prop_assert_eq!(a.size(), people);
            prop_assert_eq!(a.tools(), tools);
            prop_assert_eq!(a.food(), food);
            prop_assert!(b.is_empty());
        } else {
            prop_assert_eq!(a.size() + b.size(), people);
        }
    }

    #[test]
    fn divide_is_additive(mut original in arb_group("parent")) {
        let children = original.children();
        let adults = original.adults();
        let tools = original.tools();
        let food = original.food();
        if let Ok(offshoot) = original.divide("offshoot") {
            prop_assert_eq!(original.children() + offshoot.children(), children);
            prop_assert_eq!(original.adults() + offshoot.adults(), adults);
            prop_assert_eq!(original.tools() + offshoot.tools(), tools);
            prop_assert_eq!(original.food() + offshoot.food(), food);
            prop_assert_eq!(offshoot.morale(), original.morale());
        } else {
            prop_assert!(children <= 1 && adults <= 1);
        }
    }

    #[test]
    fn fight_outcome_is_antisymmetric(a in arb_group("a"), b in arb_group("b")) {
        let (mut a1, mut b1) = (a.clone(), b.clone());
        let (mut a2, mut b2) = (a.clone(), b.clone());
        let forward = a1.fight(&mut b1).unwrap();
        let backward = b2.fight(&mut a2).unwrap();
        let expected = match forward {
            FightOutcome::Won => FightOutcome::Lost,
            FightOutcome::Lost => FightOutcome::Won,
            FightOutcome::Draw => FightOutcome::Draw,
        };
        prop_assert_eq!(backward, expected);
    }

    #[test]
    fn trade_conserves_total_stock(mut a in arb_group("a"), mut b in arb_group("b")) {
        let tools = a.tools() + b.tools();
        let food = a.food() + b.food();
        let before = (a.tools(), a.food(), b.tools(), b.food());
        let amount = a.trade(&mut b);
        prop_assert_eq!(a.tools() + b.tools(), tools);
        prop_assert_eq!(a.food() + b.food(), food);
        if amount == 0 {
            prop_assert_eq!((a.tools(), a.food(), b.tools(), b.food()), before);
        }
    }
}
