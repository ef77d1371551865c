//! Unit-side components driven by immediate actions.
//!
//! Components are pure data with small mutators; the immediate-action
//! dispatcher flips their state and emits events for the host systems
//! (movement, rendering) that act on them.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::EntityId;

/// Transport component for units and buildings that carry passengers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transport {
    /// Maximum passenger slots.
    pub capacity: usize,
    /// Entities currently aboard.
    pub passengers: Vec<EntityId>,
}

impl Transport {
    /// Create an empty transport with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            passengers: Vec::new(),
        }
    }

    /// Free passenger slots.
    #[must_use]
    pub fn room(&self) -> usize {
        self.capacity.saturating_sub(self.passengers.len())
    }

    /// Board a passenger if there is room.
    ///
    /// Returns `false` when the transport is full.
    pub fn board(&mut self, passenger: EntityId) -> bool {
        if self.room() == 0 {
            return false;
        }
        self.passengers.push(passenger);
        true
    }

    /// Drop off every passenger, returning them in boarding order.
    pub fn release_all(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.passengers)
    }
}

/// Invisibility component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Invisibility {
    /// Whether the unit is currently invisible.
    pub active: bool,
}

impl Invisibility {
    /// Flip the invisibility state, returning the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }
}

/// One selectable attack mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackMode {
    /// Display name.
    pub name: String,
    /// Cooldown applied when switching away from this mode, in ticks.
    pub cooldown: u32,
    /// Remaining cooldown ticks (0 = selectable).
    pub cooldown_remaining: u32,
}

impl AttackMode {
    /// Create an attack mode with the given switch cooldown.
    #[must_use]
    pub fn new(name: impl Into<String>, cooldown: u32) -> Self {
        Self {
            name: name.into(),
            cooldown,
            cooldown_remaining: 0,
        }
    }

    /// Check whether the mode is cooling down.
    #[must_use]
    pub const fn is_cooling(&self) -> bool {
        self.cooldown_remaining > 0
    }
}

/// A unit's set of selectable attack modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackModes {
    /// Available modes.
    pub modes: Vec<AttackMode>,
    /// Index of the active mode.
    pub active: usize,
}

impl AttackModes {
    /// Create a mode set with the first mode active.
    #[must_use]
    pub fn new(modes: Vec<AttackMode>) -> Self {
        Self { modes, active: 0 }
    }

    /// The mode at an index.
    #[must_use]
    pub fn mode(&self, index: usize) -> Option<&AttackMode> {
        self.modes.get(index)
    }

    /// Switch the active mode.
    ///
    /// The previously active mode starts its cooldown. Returns `false` if
    /// the requested mode is cooling down or the index does not resolve.
    pub fn select(&mut self, index: usize) -> bool {
        match self.modes.get(index) {
            Some(mode) if !mode.is_cooling() => {}
            _ => return false,
        }
        if index != self.active {
            if let Some(previous) = self.modes.get_mut(self.active) {
                previous.cooldown_remaining = previous.cooldown;
            }
        }
        self.active = index;
        true
    }

    /// Tick down every mode's cooldown by one.
    pub fn tick(&mut self) {
        for mode in &mut self.modes {
            if mode.cooldown_remaining > 0 {
                mode.cooldown_remaining -= 1;
            }
        }
    }
}

/// Wandering behavior component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wander {
    /// Whether the unit is wandering.
    pub active: bool,
    /// Anchor the wander center to the unit's position on enable.
    pub fixed_center: bool,
    /// Center of the wander area.
    pub center: Vec2Fixed,
    /// Wander radius around the center.
    #[serde(with = "fixed_serde")]
    pub radius: Fixed,
}

impl Wander {
    /// Create an inactive wander component.
    #[must_use]
    pub fn new(fixed_center: bool, radius: Fixed) -> Self {
        Self {
            active: false,
            fixed_center,
            center: Vec2Fixed::ZERO,
            radius,
        }
    }

    /// Flip the wandering flag.
    ///
    /// On enable, the center is anchored to `position` when `fixed_center`
    /// is set. Returns the new state.
    pub fn toggle(&mut self, position: Vec2Fixed) -> bool {
        self.active = !self.active;
        if self.active && self.fixed_center {
            self.center = position;
        }
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_board_and_release() {
        let mut transport = Transport::new(2);
        assert!(transport.board(10));
        assert!(transport.board(11));
        assert_eq!(transport.room(), 0);
        assert!(!transport.board(12));

        assert_eq!(transport.release_all(), vec![10, 11]);
        assert_eq!(transport.room(), 2);
    }

    #[test]
    fn test_invisibility_toggle() {
        let mut invis = Invisibility::default();
        assert!(invis.toggle());
        assert!(!invis.toggle());
    }

    #[test]
    fn test_attack_mode_switch_starts_cooldown() {
        let mut modes = AttackModes::new(vec![
            AttackMode::new("kinetic", 30),
            AttackMode::new("plasma", 30),
        ]);

        assert!(modes.select(1));
        assert_eq!(modes.active, 1);
        // The mode we switched away from is cooling
        assert!(modes.mode(0).unwrap().is_cooling());
        assert!(!modes.select(0));

        // Re-selecting the active mode is a no-op, no cooldown churn
        assert!(modes.select(1));
        assert!(!modes.mode(1).unwrap().is_cooling());
    }

    #[test]
    fn test_attack_mode_cooldown_ticks_down() {
        let mut modes = AttackModes::new(vec![
            AttackMode::new("kinetic", 2),
            AttackMode::new("plasma", 0),
        ]);
        modes.select(1);

        assert!(!modes.select(0));
        modes.tick();
        assert!(!modes.select(0));
        modes.tick();
        assert!(modes.select(0));
    }

    #[test]
    fn test_wander_toggle_anchors_fixed_center() {
        let position = Vec2Fixed::new(Fixed::from_num(12), Fixed::from_num(-3));
        let mut wander = Wander::new(true, Fixed::from_num(8));

        assert!(wander.toggle(position));
        assert_eq!(wander.center, position);

        // Disabling leaves the anchor alone
        assert!(!wander.toggle(Vec2Fixed::ZERO));
        assert_eq!(wander.center, position);
    }

    #[test]
    fn test_wander_toggle_free_center() {
        let mut wander = Wander::new(false, Fixed::from_num(8));
        wander.center = Vec2Fixed::new(Fixed::from_num(1), Fixed::from_num(1));

        assert!(wander.toggle(Vec2Fixed::ZERO));
        // Free-center wander keeps its configured center
        assert_eq!(
            wander.center,
            Vec2Fixed::new(Fixed::from_num(1), Fixed::from_num(1))
        );
    }
}
