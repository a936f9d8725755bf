//! Ephemeral per-instance state that strategies read and write.

use std::collections::BTreeMap;

use super::EntityId;

/// Decrements a countdown and reports whether it crossed zero on this call.
///
/// A timer that is already at or below zero never fires again, so a countdown
/// triggers exactly once per arming. The value is clamped to zero on crossing.
#[inline]
pub fn countdown(timer: &mut f32, elapsed: f32) -> bool {
    if *timer <= 0.0 {
        return false;
    }
    *timer -= elapsed;
    if *timer <= 0.0 {
        *timer = 0.0;
        true
    } else {
        false
    }
}

/// Mutable scratch data owned by exactly one live creature.
///
/// The fixed fields cover what almost every strategy needs; the two open stores
/// are reserved for strategy-specific extensions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuntimeState {
    /// Id of the definition this creature was loaded from.
    pub definition_id: String,
    /// Behavior key cached at load time; selects the assigned strategy.
    pub behavior_key: String,
    /// Discrete state of the assigned strategy's machine.
    pub ai_state: i32,
    /// General-purpose countdown, reset to zero on (re)load.
    pub state_timer: f32,
    /// Rejects every damage event before the strategy is consulted.
    pub invincible_override: bool,
    pub scratch_float: f32,
    pub scratch_flag: bool,
    pub vars: FloatVars,
    pub refs: EntityRefs,
}

impl RuntimeState {
    pub fn new(definition_id: impl Into<String>) -> Self {
        Self {
            definition_id: definition_id.into(),
            ..Self::default()
        }
    }

    /// Counts the state timer down; see [`countdown`].
    pub fn tick_state_timer(&mut self, elapsed: f32) -> bool {
        countdown(&mut self.state_timer, elapsed)
    }

    /// Resets the fixed fields. Named stores are left untouched.
    pub fn reset_machine(&mut self) {
        self.ai_state = 0;
        self.state_timer = 0.0;
    }

    /// Drops every named entry and clears the scratch fields.
    pub fn clear_stores(&mut self) {
        self.invincible_override = false;
        self.scratch_float = 0.0;
        self.scratch_flag = false;
        self.vars.clear();
        self.refs.clear();
    }
}

/// Named float variables: countdown timers and 0/1 flags.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FloatVars {
    values: BTreeMap<String, f32>,
}

impl FloatVars {
    /// Value of `key`, or `0.0` when absent.
    pub fn get(&self, key: &str) -> f32 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn get_opt(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    pub fn set(&mut self, key: &str, value: f32) {
        match self.values.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.values.insert(key.to_owned(), value);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<f32> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key) != 0.0
    }

    pub fn set_flag(&mut self, key: &str, on: bool) {
        self.set(key, if on { 1.0 } else { 0.0 });
    }

    /// True while the named timer holds a positive value.
    pub fn is_running(&self, key: &str) -> bool {
        self.get(key) > 0.0
    }

    /// Counts a named timer down; absent timers never fire. See [`countdown`].
    pub fn countdown(&mut self, key: &str, elapsed: f32) -> bool {
        self.values
            .get_mut(key)
            .is_some_and(|timer| countdown(timer, elapsed))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named non-owning references to other live creatures.
///
/// Entries are lookup handles. Strategies must re-validate them against the
/// world on every use and remove them as soon as the target is gone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityRefs {
    values: BTreeMap<String, EntityId>,
}

impl EntityRefs {
    pub fn get(&self, key: &str) -> Option<EntityId> {
        self.values.get(key).copied()
    }

    pub fn set(&mut self, key: &str, id: EntityId) {
        self.values.insert(key.to_owned(), id);
    }

    pub fn remove(&mut self, key: &str) -> Option<EntityId> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Drops every entry whose target fails `is_alive`.
    pub fn retain_live(&mut self, mut is_alive: impl FnMut(EntityId) -> bool) {
        self.values.retain(|_, id| is_alive(*id));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_once_on_crossing() {
        let mut timer = 0.5;
        assert!(!countdown(&mut timer, 0.2));
        assert!(countdown(&mut timer, 0.4));
        assert_eq!(timer, 0.0);
        assert!(!countdown(&mut timer, 0.1));
    }

    #[test]
    fn countdown_fires_when_landing_exactly_on_zero() {
        let mut timer = 0.25;
        assert!(countdown(&mut timer, 0.25));
    }

    #[test]
    fn absent_named_timer_never_fires() {
        let mut vars = FloatVars::default();
        assert!(!vars.countdown("wake", 1.0));
        vars.set("wake", 0.1);
        assert!(vars.countdown("wake", 1.0));
        assert!(!vars.is_running("wake"));
    }

    #[test]
    fn flags_are_stored_as_zero_or_one() {
        let mut vars = FloatVars::default();
        vars.set_flag("airborne", true);
        assert_eq!(vars.get("airborne"), 1.0);
        vars.set_flag("airborne", false);
        assert!(!vars.flag("airborne"));
    }

    #[test]
    fn refs_drop_dead_targets() {
        let mut refs = EntityRefs::default();
        refs.set("mate", EntityId(4));
        refs.set("leader", EntityId(9));
        refs.retain_live(|id| id == EntityId(9));
        assert_eq!(refs.get("mate"), None);
        assert_eq!(refs.get("leader"), Some(EntityId(9)));
    }

    #[test]
    fn reset_machine_keeps_named_stores() {
        let mut state = RuntimeState::new("imp");
        state.ai_state = 3;
        state.state_timer = 2.0;
        state.vars.set("cooldown", 5.0);
        state.reset_machine();
        assert_eq!(state.ai_state, 0);
        assert_eq!(state.state_timer, 0.0);
        assert_eq!(state.vars.get("cooldown"), 5.0);
    }
}
