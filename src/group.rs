//! Group - a migrating band of hunter-gatherers
//!
//! Groups are the unit everything else aliases: a clan owns each group,
//! areas hold references to it, and every pairwise operation (unite, divide,
//! fight, trade) mutates the one canonical record.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::config::{
    FOOD_PER_ADULT, FOOD_PER_CHILD, MAX_MORALE, STARTING_MORALE, TOOLS_PER_ADULT,
    UNITE_MORALE_FLOOR,
};
use crate::core::error::{Result, SimError};
use crate::core::types::FightOutcome;

/// A band of people with shared resources and morale.
///
/// A group whose population reaches zero is "emptied": every field is reset
/// and the record is treated as destroyed. Holders prune emptied groups from
/// their collections; the arena slot itself stays behind as a tombstone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    name: String,
    clan: Option<String>,
    children: u32,
    adults: u32,
    tools: u32,
    food: u32,
    morale: u32,
}

impl Group {
    /// Create a group with explicit resourcing. `clan` of `None` means the
    /// group does not belong to any clan yet.
    pub fn new(
        name: &str,
        clan: Option<&str>,
        children: u32,
        adults: u32,
        tools: u32,
        food: u32,
        morale: u32,
    ) -> Result<Self> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument("group name is empty".into()));
        }
        if children + adults == 0 {
            return Err(SimError::InvalidArgument(format!(
                "group {name} would have no people"
            )));
        }
        if morale > MAX_MORALE {
            return Err(SimError::InvalidArgument(format!(
                "morale {morale} is above {MAX_MORALE}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            clan: clan.map(str::to_string),
            children,
            adults,
            tools,
            food,
            morale,
        })
    }

    /// Found a clan-less group with default resourcing: 4 tools per adult,
    /// 3 food per adult plus 2 per child, morale 70.
    pub fn found(name: &str, children: u32, adults: u32) -> Result<Self> {
        Self::new(
            name,
            None,
            children,
            adults,
            TOOLS_PER_ADULT * adults,
            FOOD_PER_ADULT * adults + FOOD_PER_CHILD * children,
            STARTING_MORALE,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clan(&self) -> Option<&str> {
        self.clan.as_deref()
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn tools(&self) -> u32 {
        self.tools
    }

    pub fn food(&self) -> u32 {
        self.food
    }

    pub fn morale(&self) -> u32 {
        self.morale
    }

    /// Total population.
    pub fn size(&self) -> u32 {
        self.children + self.adults
    }

    /// An emptied group has no people left and counts as destroyed.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Combat and influence strength:
    /// `(10*adults + 3*children) * (10*tools + food) * morale / 100` (floor).
    pub fn power(&self) -> u64 {
        let people = u64::from(10 * self.adults + 3 * self.children);
        let gear = u64::from(10 * self.tools + self.food);
        people * gear * u64::from(self.morale) / 100
    }

    /// Total order used whenever groups compete: primary key power,
    /// ties broken by name ascending.
    pub fn strength_cmp(&self, other: &Group) -> Ordering {
        self.power()
            .cmp(&other.power())
            .then_with(|| self.name.cmp(&other.name))
    }

    pub fn is_stronger(&self, other: &Group) -> bool {
        self.strength_cmp(other) == Ordering::Greater
    }

    pub fn is_weaker(&self, other: &Group) -> bool {
        self.strength_cmp(other) == Ordering::Less
    }

    /// True when both power and name are equal.
    pub fn same_rank(&self, other: &Group) -> bool {
        self.power() == other.power() && self.name == other.name
    }

    /// True only when power and name *both* differ.
    ///
    /// Deliberately not the negation of [`same_rank`](Self::same_rank): a pair
    /// that differs in exactly one of the two keys satisfies neither
    /// predicate. Callers that need a strict equivalence should compare
    /// `strength_cmp` against `Ordering::Equal` instead.
    pub fn distinct_rank(&self, other: &Group) -> bool {
        self.power() != other.power() && self.name != other.name
    }

    /// Move the group to a new clan, adjusting morale.
    ///
    /// No-op when the clan is unchanged. A clan-less group gains 10% morale
    /// (floor, capped at 100); a group leaving a clan for another loses 10%
    /// (floor, bottoming out at 0).
    pub fn change_clan(&mut self, clan: &str) {
        if self.clan.as_deref() == Some(clan) {
            return;
        }
        let tithe = self.morale / 10;
        if self.clan.is_none() {
            self.morale = (self.morale + tithe).min(MAX_MORALE);
        } else {
            self.morale -= tithe;
        }
        self.clan = Some(clan.to_string());
    }

    /// Merge `other` into this group.
    ///
    /// Fails without touching either group unless both belong to the same
    /// clan, both have morale of at least 70, and their combined size stays
    /// within `max_amount`. On success this group keeps the name of the more
    /// powerful of the two (unchanged on a power tie), sums every resource,
    /// takes the population-weighted morale average (floor), and `other` is
    /// emptied.
    pub fn unite(&mut self, other: &mut Group, max_amount: u32) -> bool {
        let same_clan = match (&self.clan, &other.clan) {
            (Some(a), Some(b)) => a == b,
            _ => return false,
        };
        if !same_clan
            || self.size() + other.size() > max_amount
            || self.morale < UNITE_MORALE_FLOOR
            || other.morale < UNITE_MORALE_FLOOR
        {
            return false;
        }
        if other.power() > self.power() {
            self.name = other.name.clone();
        }
        self.morale = (self.size() * self.morale + other.size() * other.morale)
            / (self.size() + other.size());
        self.children += other.children;
        self.adults += other.adults;
        self.tools += other.tools;
        self.food += other.food;
        other.empty_out();
        true
    }

    /// Split off a new group named `name`.
    ///
    /// The new group receives half of children, adults, tools, and food
    /// (floor each); this group keeps the remainder. Both keep the clan and
    /// morale. Fails when the name is empty, or when the group has at most
    /// one child and one adult.
    pub fn divide(&mut self, name: &str) -> Result<Group> {
        if name.is_empty() {
            return Err(SimError::InvalidArgument(
                "name for the divided group is empty".into(),
            ));
        }
        if self.children <= 1 && self.adults <= 1 {
            return Err(SimError::CannotDivide(self.name.clone()));
        }
        let offshoot = Group {
            name: name.to_string(),
            clan: self.clan.clone(),
            children: self.children / 2,
            adults: self.adults / 2,
            tools: self.tools / 2,
            food: self.food / 2,
            morale: self.morale,
        };
        self.children -= offshoot.children;
        self.adults -= offshoot.adults;
        self.tools -= offshoot.tools;
        self.food -= offshoot.food;
        Ok(offshoot)
    }

    /// Fight an opponent. The stronger group per [`strength_cmp`]
    /// (Self::strength_cmp) wins; equal strength is a draw with no effects.
    ///
    /// Fails when either side is already empty. Identity is checked by the
    /// arena, which refuses to hand out a group paired with itself.
    pub fn fight(&mut self, opponent: &mut Group) -> Result<FightOutcome> {
        if self.is_empty() || opponent.is_empty() {
            let empty = if self.is_empty() { &self.name } else { &opponent.name };
            return Err(SimError::InvalidArgument(format!(
                "group {empty} has no people left to fight"
            )));
        }
        match self.strength_cmp(opponent) {
            Ordering::Greater => {
                apply_fight_effects(self, opponent);
                Ok(FightOutcome::Won)
            }
            Ordering::Less => {
                apply_fight_effects(opponent, self);
                Ok(FightOutcome::Lost)
            }
            Ordering::Equal => Ok(FightOutcome::Draw),
        }
    }

    /// Trade towards balancing tools against food, returning the amount
    /// exchanged (0 when no trade happens).
    ///
    /// No trade happens when either side has tools equal to food, or when
    /// both sides are rich in the same resource. Otherwise each side offers
    /// `ceil(|tools - food| / 2)` of its surplus resource; the traded amount
    /// is the ceiling average of the two offers, clamped down to what the
    /// giving side actually has in stock.
    pub fn trade(&mut self, other: &mut Group) -> u32 {
        if self.tools == self.food || other.tools == other.food {
            return 0;
        }
        if (self.tools > self.food) == (other.tools > other.food) {
            return 0;
        }
        let (rich_in_tools, rich_in_food) = if self.tools > self.food {
            (self, other)
        } else {
            (other, self)
        };
        let tools_offer = (rich_in_tools.tools - rich_in_tools.food).div_ceil(2);
        let food_offer = (rich_in_food.food - rich_in_food.tools).div_ceil(2);
        let mut amount = (tools_offer + food_offer).div_ceil(2);
        if rich_in_tools.tools <= amount {
            amount = rich_in_tools.tools;
        } else if rich_in_food.food <= amount {
            amount = rich_in_food.food;
        }
        rich_in_tools.tools -= amount;
        rich_in_tools.food += amount;
        rich_in_food.food -= amount;
        rich_in_food.tools += amount;
        amount
    }

    /// Reset every field. The group counts as destroyed afterwards.
    pub(crate) fn empty_out(&mut self) {
        self.name.clear();
        self.clan = None;
        self.children = 0;
        self.adults = 0;
        self.tools = 0;
        self.food = 0;
        self.morale = 0;
    }
}

/// Apply the outcome of a decided fight to both sides.
///
/// Winner effects use the loser's pre-fight food. A loser whose population
/// reaches zero is emptied and skips the resource and morale penalties.
fn apply_fight_effects(winner: &mut Group, loser: &mut Group) {
    let loser_food_before = loser.food;
    winner.adults -= winner.adults / 4;
    winner.tools -= winner.tools / 4;
    winner.food += loser_food_before.div_ceil(2) / 2;
    winner.morale = (winner.morale + winner.morale.div_ceil(5)).min(MAX_MORALE);

    loser.adults = 2 * loser.adults / 3;
    loser.children = 2 * loser.children / 3;
    if loser.size() == 0 {
        loser.empty_out();
        return;
    }
    loser.tools /= 2;
    loser.food /= 2;
    loser.morale = 4 * loser.morale / 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, children: u32, adults: u32, tools: u32, food: u32, morale: u32) -> Group {
        Group::new(name, Some("clan"), children, adults, tools, food, morale).unwrap()
    }

    #[test]
    fn test_found_defaults() {
        let g = Group::found("Hunters", 4, 6).unwrap();
        assert_eq!(g.tools(), 24);
        assert_eq!(g.food(), 26);
        assert_eq!(g.morale(), 70);
        assert_eq!(g.clan(), None);
        assert_eq!(g.size(), 10);
    }

    #[test]
    fn test_power_formula() {
        // (10*6 + 3*4) * (10*24 + 26) * 70 / 100
        let g = Group::found("Hunters", 4, 6).unwrap();
        assert_eq!(g.power(), 72 * 266 * 70 / 100);
    }

    #[test]
    fn test_new_rejects_bad_arguments() {
        assert!(Group::new("", None, 1, 1, 0, 0, 50).is_err());
        assert!(Group::new("g", None, 0, 0, 0, 0, 50).is_err());
        assert!(Group::new("g", None, 1, 1, 0, 0, 101).is_err());
    }

    #[test]
    fn test_change_clan_morale() {
        let mut g = Group::found("g", 2, 3).unwrap();
        g.change_clan("alpha");
        assert_eq!(g.morale(), 77); // +10% for the first clan
        g.change_clan("alpha");
        assert_eq!(g.morale(), 77); // unchanged clan is a no-op
        g.change_clan("beta");
        assert_eq!(g.morale(), 70); // -10% when switching clans
    }

    #[test]
    fn test_change_clan_morale_caps() {
        let mut g = Group::new("g", None, 1, 1, 0, 0, 95).unwrap();
        g.change_clan("alpha");
        assert_eq!(g.morale(), 100);
        let mut weary = Group::new("w", Some("alpha"), 1, 1, 0, 0, 0).unwrap();
        weary.change_clan("beta");
        assert_eq!(weary.morale(), 0);
    }

    #[test]
    fn test_strength_order_ties_on_name() {
        let a = group("alpha", 1, 1, 5, 5, 50);
        let b = group("beta", 1, 1, 5, 5, 50);
        assert_eq!(a.power(), b.power());
        assert!(a.is_weaker(&b));
        assert!(b.is_stronger(&a));
    }

    #[test]
    fn test_rank_predicates_leave_a_gap() {
        let a = group("alpha", 1, 1, 5, 5, 50);
        let same_power = group("beta", 1, 1, 5, 5, 50);
        // Same power, different name: neither predicate holds.
        assert!(!a.same_rank(&same_power));
        assert!(!a.distinct_rank(&same_power));
        let twin = group("alpha", 1, 1, 5, 5, 50);
        assert!(a.same_rank(&twin));
        let other = group("gamma", 2, 2, 9, 9, 80);
        assert!(a.distinct_rank(&other));
    }

    #[test]
    fn test_unite_keeps_stronger_name_and_sums() {
        let mut a = group("a", 2, 4, 10, 10, 80);
        let mut b = group("b", 1, 2, 4, 4, 75);
        assert!(a.power() > b.power());
        let (size_a, size_b) = (a.size(), b.size());
        assert!(a.unite(&mut b, 100));
        assert_eq!(a.name(), "a");
        assert_eq!(a.size(), size_a + size_b);
        assert_eq!(a.tools(), 14);
        assert_eq!(a.food(), 14);
        // Weighted morale: (6*80 + 3*75) / 9
        assert_eq!(a.morale(), (6 * 80 + 3 * 75) / 9);
        assert!(b.is_empty());
        assert_eq!(b.name(), "");
    }

    #[test]
    fn test_unite_takes_name_of_more_powerful_other() {
        let mut weak = group("weak", 1, 2, 4, 4, 75);
        let mut strong = group("strong", 2, 4, 10, 10, 80);
        assert!(weak.unite(&mut strong, 100));
        assert_eq!(weak.name(), "strong");
    }

    #[test]
    fn test_unite_power_tie_keeps_name() {
        // Equal power, different names: the absorbing group keeps its own.
        let mut a = group("zeta", 1, 1, 5, 5, 80);
        let mut b = group("alpha", 1, 1, 5, 5, 80);
        assert_eq!(a.power(), b.power());
        assert!(a.unite(&mut b, 100));
        assert_eq!(a.name(), "zeta");
    }

    #[test]
    fn test_unite_preconditions() {
        let mut clanless = Group::found("x", 1, 1).unwrap();
        let mut a = group("a", 2, 4, 10, 10, 80);
        assert!(!a.unite(&mut clanless, 100));

        let mut other_clan = Group::new("o", Some("other"), 1, 1, 2, 2, 80).unwrap();
        assert!(!a.unite(&mut other_clan, 100));

        let mut low_morale = Group::new("l", Some("clan"), 1, 1, 2, 2, 69).unwrap();
        assert!(!a.unite(&mut low_morale, 100));

        let mut b = group("b", 1, 2, 4, 4, 75);
        let cap = a.size() + b.size() - 1;
        assert!(!a.unite(&mut b, cap));
        // Failure leaves both untouched.
        assert_eq!(b.size(), 3);
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn test_divide_splits_floor_and_remainder() {
        let mut g = group("band", 5, 7, 9, 11, 66);
        let off = g.divide("band_2").unwrap();
        assert_eq!(off.children(), 2);
        assert_eq!(off.adults(), 3);
        assert_eq!(off.tools(), 4);
        assert_eq!(off.food(), 5);
        assert_eq!(off.morale(), 66);
        assert_eq!(off.clan(), Some("clan"));
        assert_eq!(g.children(), 3);
        assert_eq!(g.adults(), 4);
        assert_eq!(g.tools(), 5);
        assert_eq!(g.food(), 6);
    }

    #[test]
    fn test_divide_failures() {
        let mut g = group("band", 5, 7, 9, 11, 66);
        assert!(matches!(g.divide(""), Err(SimError::InvalidArgument(_))));
        let mut tiny = group("tiny", 1, 1, 9, 11, 66);
        assert!(matches!(tiny.divide("t_2"), Err(SimError::CannotDivide(_))));
    }

    #[test]
    fn test_fight_loser_effects() {
        // 5 adults, 3 tools, 50 morale on the losing side becomes
        // 3 adults, 1 tool, 40 morale.
        let mut winner = group("big", 4, 8, 20, 20, 90);
        let mut loser = group("small", 0, 5, 3, 10, 50);
        assert_eq!(winner.fight(&mut loser).unwrap(), FightOutcome::Won);
        assert_eq!(loser.adults(), 3);
        assert_eq!(loser.tools(), 1);
        assert_eq!(loser.morale(), 40);
        assert_eq!(loser.food(), 5);
    }

    #[test]
    fn test_fight_winner_effects_use_prefight_food() {
        let mut winner = group("big", 4, 8, 20, 20, 90);
        let mut loser = group("small", 0, 5, 3, 10, 50);
        winner.fight(&mut loser).unwrap();
        assert_eq!(winner.adults(), 6); // 8 - 8/4
        assert_eq!(winner.tools(), 15); // 20 - 20/4
        assert_eq!(winner.food(), 20 + (10u32.div_ceil(2)) / 2); // ceil(10/2)/2 = 2
        assert_eq!(winner.morale(), 100); // 90 + ceil(18) capped
        assert_eq!(winner.children(), 4); // children untouched
    }

    #[test]
    fn test_fight_empties_crushed_loser() {
        let mut winner = group("big", 4, 8, 20, 20, 90);
        let mut loser = group("one", 1, 0, 6, 8, 50);
        winner.fight(&mut loser).unwrap();
        assert!(loser.is_empty());
        assert_eq!(loser.name(), "");
        // Winner still collects food from the emptied loser.
        assert_eq!(winner.food(), 20 + 2);
    }

    #[test]
    fn test_fight_draw_changes_nothing() {
        let mut a = group("same", 1, 1, 5, 5, 50);
        let mut b = group("same", 1, 1, 5, 5, 50);
        assert_eq!(a.fight(&mut b).unwrap(), FightOutcome::Draw);
        assert_eq!(a.tools(), 5);
        assert_eq!(b.tools(), 5);
    }

    #[test]
    fn test_fight_empty_group_is_an_error() {
        let mut a = group("a", 1, 1, 5, 5, 50);
        let mut b = group("b", 1, 1, 5, 5, 50);
        b.empty_out();
        assert!(a.fight(&mut b).is_err());
    }

    #[test]
    fn test_trade_balances_towards_equal() {
        let mut toolmakers = group("t", 1, 1, 10, 2, 50);
        let mut farmers = group("f", 1, 1, 1, 5, 50);
        // Offers: ceil(8/2)=4 and ceil(4/2)=2, amount ceil(6/2)=3.
        assert_eq!(toolmakers.trade(&mut farmers), 3);
        assert_eq!(toolmakers.tools(), 7);
        assert_eq!(toolmakers.food(), 5);
        assert_eq!(farmers.tools(), 4);
        assert_eq!(farmers.food(), 2);
    }

    #[test]
    fn test_trade_clamps_to_stock() {
        let mut toolmakers = group("t", 1, 1, 3, 0, 50);
        let mut farmers = group("f", 1, 1, 0, 9, 50);
        // Offers ceil(3/2)=2 and ceil(9/2)=5, amount ceil(7/2)=4, clamped to 3 tools.
        assert_eq!(toolmakers.trade(&mut farmers), 3);
        assert_eq!(toolmakers.tools(), 0);
        assert_eq!(toolmakers.food(), 3);
        assert_eq!(farmers.tools(), 3);
        assert_eq!(farmers.food(), 6);
    }

    #[test]
    fn test_trade_refused() {
        let mut balanced = group("b", 1, 1, 4, 4, 50);
        let mut farmers = group("f", 1, 1, 0, 9, 50);
        assert_eq!(balanced.trade(&mut farmers), 0);

        let mut rich_a = group("a", 1, 1, 9, 2, 50);
        let mut rich_b = group("c", 1, 1, 7, 3, 50);
        assert_eq!(rich_a.trade(&mut rich_b), 0);
        assert_eq!(rich_a.tools(), 9);
    }
}
