//! Immediate actions: task-panel buttons that execute instantly instead of
//! queueing.
//!
//! Each action variant carries its own typed payload, so a batch index can
//! never be mistaken for a task key or a building type. Actions mutate the
//! selection's components directly and emit events for the host systems
//! that carry the effect further (movement, placement UI, production).
//!
//! Targeted kinds (move, attack, build, ...) have no instant effect; they
//! park in the [`PendingCommand`] latch until the input layer delivers a
//! target.

use serde::{Deserialize, Serialize};

use crate::buildings::{BatchIndex, Placement};
use crate::catalog::{BuildingTypeId, IconId, TaskKind};
use crate::economy::{ResourceId, ResourceLedger};
use crate::error::{Result, TaskError};
use crate::factions::{FactionId, FactionRegistry};
use crate::notify::{Hud, MessageKind};
use crate::selection::SelectionContext;
use crate::units::Transport;
use crate::EntityId;

/// An instantly-executed task-panel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstantAction {
    /// Collect a ready resource batch from the selected building.
    CollectResource {
        /// Index into the generator's ready list.
        batch: BatchIndex,
    },
    /// Drop off everyone aboard the selected transport.
    ReleaseTransport,
    /// Ask nearby eligible units to board the selected transport.
    CallTransport,
    /// Enter placement mode for a building type.
    PlaceBuilding {
        /// The building type to place.
        building: BuildingTypeId,
    },
    /// Flip the first selected unit's invisibility.
    ToggleInvisibility,
    /// Switch the first selected unit's active attack mode.
    SelectAttackMode {
        /// Index into the unit's mode list.
        mode: usize,
    },
    /// Flip the first selected unit's wandering behavior.
    ToggleWander,
    /// Trigger the selected building's upgrade check.
    UpgradeBuilding,
    /// Park a targeted command until the player picks a target.
    AwaitTarget {
        /// The targeted task kind.
        kind: TaskKind,
        /// Icon shown while awaiting input.
        icon: IconId,
    },
}

/// Events emitted by immediate actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEvent {
    /// A resource batch was collected and credited.
    ResourceCollected {
        /// The generating building.
        building: EntityId,
        /// The collected resource.
        resource: ResourceId,
        /// Amount credited.
        amount: i32,
    },
    /// A transport dropped off its passengers.
    PassengersReleased {
        /// The transport entity.
        transport: EntityId,
        /// Passengers in boarding order.
        passengers: Vec<EntityId>,
    },
    /// A transport requested boarding; movement fulfills it.
    TransportCalled {
        /// The transport entity.
        transport: EntityId,
        /// Free passenger slots.
        room: usize,
    },
    /// Placement mode was entered for a building type.
    PlacementStarted {
        /// The building type being placed.
        building: BuildingTypeId,
    },
    /// A unit's invisibility flipped.
    InvisibilityToggled {
        /// The unit.
        unit: EntityId,
        /// New state.
        active: bool,
    },
    /// A unit switched attack modes.
    AttackModeSelected {
        /// The unit.
        unit: EntityId,
        /// Index of the newly active mode.
        mode: usize,
    },
    /// A unit's wandering flipped.
    WanderToggled {
        /// The unit.
        unit: EntityId,
        /// New state.
        active: bool,
    },
    /// The selected building should run its upgrade check.
    BuildingUpgradeRequested {
        /// The building.
        building: EntityId,
    },
    /// A targeted command is awaiting further input.
    AwaitingTarget {
        /// The parked task kind.
        kind: TaskKind,
    },
}

/// The awaiting-further-input latch.
///
/// Holds at most one parked command; parking a new one replaces the old.
/// The input layer takes the command when the player delivers a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingCommand {
    slot: Option<(TaskKind, IconId)>,
}

impl PendingCommand {
    /// Create an empty latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a command.
    pub fn set(&mut self, kind: TaskKind, icon: IconId) {
        self.slot = Some((kind, icon));
    }

    /// The parked command, if any.
    #[must_use]
    pub const fn get(&self) -> Option<(TaskKind, IconId)> {
        self.slot
    }

    /// Take the parked command, leaving the latch empty.
    pub fn take(&mut self) -> Option<(TaskKind, IconId)> {
        self.slot.take()
    }

    /// Check whether a command is parked.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

/// The selected transport: the building's if it has one, else the first
/// selected unit's.
fn selected_transport(
    selection: &mut SelectionContext,
) -> Result<(EntityId, &mut Transport)> {
    let building_has_transport = selection
        .building
        .as_ref()
        .is_some_and(|b| b.transport.is_some());

    if building_has_transport {
        let building = selection
            .building
            .as_mut()
            .ok_or(TaskError::NoBuildingSelected)?;
        let id = building.id;
        let transport = building
            .transport
            .as_mut()
            .ok_or(TaskError::MissingComponent("transport"))?;
        return Ok((id, transport));
    }

    let unit = selection
        .units
        .first_mut()
        .ok_or(TaskError::NoUnitSelected)?;
    let id = unit.id;
    let transport = unit
        .transport
        .as_mut()
        .ok_or(TaskError::MissingComponent("transport"))?;
    Ok((id, transport))
}

/// Execute one immediate action.
///
/// `faction` is the acting player's faction, used for placement limits and
/// resource credits. Policy failures (placement limit reached, attack mode
/// cooling down, transport full) show a HUD error and return no events;
/// missing selection or components are structural errors.
pub fn dispatch_instant(
    action: InstantAction,
    faction: FactionId,
    selection: &mut SelectionContext,
    placement: &mut Placement,
    pending: &mut PendingCommand,
    factions: &FactionRegistry,
    ledger: &mut ResourceLedger,
    hud: &mut dyn Hud,
) -> Result<Vec<ActionEvent>> {
    match action {
        InstantAction::CollectResource { batch } => {
            let building = selection
                .building
                .as_mut()
                .ok_or(TaskError::NoBuildingSelected)?;
            let generator = building
                .resource_gen
                .as_mut()
                .ok_or(TaskError::MissingComponent("resource generator"))?;
            let collected = generator
                .collect(batch)
                .ok_or(TaskError::UnknownBatch(batch))?;
            ledger.credit(faction, collected.resource, collected.amount);
            Ok(vec![ActionEvent::ResourceCollected {
                building: building.id,
                resource: collected.resource,
                amount: collected.amount,
            }])
        }

        InstantAction::ReleaseTransport => {
            let (id, transport) = selected_transport(selection)?;
            let passengers = transport.release_all();
            Ok(vec![ActionEvent::PassengersReleased {
                transport: id,
                passengers,
            }])
        }

        InstantAction::CallTransport => {
            let (id, transport) = selected_transport(selection)?;
            let room = transport.room();
            if room == 0 {
                hud.show_message("Transport is full", MessageKind::Error);
                return Ok(Vec::new());
            }
            Ok(vec![ActionEvent::TransportCalled {
                transport: id,
                room,
            }])
        }

        InstantAction::PlaceBuilding { building } => {
            let state = factions.get(faction)?;
            if state.caps.building_limit_reached(building) {
                hud.show_message(
                    "This building has reached its placement limit",
                    MessageKind::Error,
                );
                return Ok(Vec::new());
            }
            placement.start(building);
            Ok(vec![ActionEvent::PlacementStarted { building }])
        }

        InstantAction::ToggleInvisibility => {
            let unit = selection
                .first_unit_mut()
                .ok_or(TaskError::NoUnitSelected)?;
            let invisibility = unit
                .invisibility
                .as_mut()
                .ok_or(TaskError::MissingComponent("invisibility"))?;
            let active = invisibility.toggle();
            Ok(vec![ActionEvent::InvisibilityToggled {
                unit: unit.id,
                active,
            }])
        }

        InstantAction::SelectAttackMode { mode } => {
            let unit = selection
                .first_unit_mut()
                .ok_or(TaskError::NoUnitSelected)?;
            let modes = unit
                .attack_modes
                .as_mut()
                .ok_or(TaskError::MissingComponent("attack modes"))?;
            let requested = modes.mode(mode).ok_or(TaskError::UnknownAttackMode(mode))?;
            if requested.is_cooling() {
                hud.show_message("Attack mode is cooling down", MessageKind::Error);
                return Ok(Vec::new());
            }
            modes.select(mode);
            Ok(vec![ActionEvent::AttackModeSelected {
                unit: unit.id,
                mode,
            }])
        }

        InstantAction::ToggleWander => {
            let unit = selection
                .first_unit_mut()
                .ok_or(TaskError::NoUnitSelected)?;
            let position = unit.position;
            let wander = unit
                .wander
                .as_mut()
                .ok_or(TaskError::MissingComponent("wander"))?;
            let active = wander.toggle(position);
            if active {
                hud.refresh_task_panel();
            }
            Ok(vec![ActionEvent::WanderToggled {
                unit: unit.id,
                active,
            }])
        }

        InstantAction::UpgradeBuilding => {
            let building = selection
                .building
                .as_ref()
                .ok_or(TaskError::NoBuildingSelected)?;
            Ok(vec![ActionEvent::BuildingUpgradeRequested {
                building: building.id,
            }])
        }

        InstantAction::AwaitTarget { kind, icon } => {
            pending.set(kind, icon);
            tracing::debug!(?kind, "command awaiting target");
            Ok(vec![ActionEvent::AwaitingTarget { kind }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::ResourceGenerator;
    use crate::factions::FactionState;
    use crate::math::{Fixed, Vec2Fixed};
    use crate::notify::NullHud;
    use crate::selection::{SelectedBuilding, SelectedUnit};
    use crate::units::{AttackMode, AttackModes, Invisibility, Wander};

    const PLAYER: FactionId = FactionId(0);
    const ORE: ResourceId = ResourceId(2);

    struct Fixture {
        selection: SelectionContext,
        placement: Placement,
        pending: PendingCommand,
        factions: FactionRegistry,
        ledger: ResourceLedger,
    }

    fn fixture() -> Fixture {
        let mut factions = FactionRegistry::new();
        factions.register(PLAYER, FactionState::new(10));
        Fixture {
            selection: SelectionContext::new(),
            placement: Placement::new(),
            pending: PendingCommand::new(),
            factions,
            ledger: ResourceLedger::new(),
        }
    }

    fn dispatch(f: &mut Fixture, action: InstantAction) -> Result<Vec<ActionEvent>> {
        dispatch_instant(
            action,
            PLAYER,
            &mut f.selection,
            &mut f.placement,
            &mut f.pending,
            &f.factions,
            &mut f.ledger,
            &mut NullHud,
        )
    }

    fn plain_unit(id: u64) -> SelectedUnit {
        SelectedUnit::new(id, PLAYER, Vec2Fixed::ZERO)
    }

    #[test]
    fn test_collect_resource_credits_faction() {
        let mut f = fixture();
        let mut building = SelectedBuilding::new(3, PLAYER);
        let mut generator = ResourceGenerator::new(ORE, 25, 1, 4);
        generator.tick();
        building.resource_gen = Some(generator);
        f.selection.building = Some(building);

        let events = dispatch(
            &mut f,
            InstantAction::CollectResource {
                batch: BatchIndex(0),
            },
        )
        .unwrap();

        assert!(matches!(
            events[0],
            ActionEvent::ResourceCollected {
                building: 3,
                amount: 25,
                ..
            }
        ));
        assert_eq!(f.ledger.stockpile(PLAYER).unwrap().amount(ORE), 25);
    }

    #[test]
    fn test_collect_requires_selected_building() {
        let mut f = fixture();
        let result = dispatch(
            &mut f,
            InstantAction::CollectResource {
                batch: BatchIndex(0),
            },
        );
        assert!(matches!(result, Err(TaskError::NoBuildingSelected)));
    }

    #[test]
    fn test_release_prefers_building_transport() {
        let mut f = fixture();
        let mut building = SelectedBuilding::new(3, PLAYER);
        let mut transport = Transport::new(4);
        transport.board(20);
        transport.board(21);
        building.transport = Some(transport);
        f.selection.building = Some(building);

        let mut unit = plain_unit(9);
        unit.transport = Some(Transport::new(2));
        f.selection.units.push(unit);

        let events = dispatch(&mut f, InstantAction::ReleaseTransport).unwrap();
        assert_eq!(
            events[0],
            ActionEvent::PassengersReleased {
                transport: 3,
                passengers: vec![20, 21],
            }
        );
    }

    #[test]
    fn test_release_falls_back_to_first_unit() {
        let mut f = fixture();
        let mut unit = plain_unit(9);
        let mut transport = Transport::new(2);
        transport.board(30);
        unit.transport = Some(transport);
        f.selection.units.push(unit);

        let events = dispatch(&mut f, InstantAction::ReleaseTransport).unwrap();
        assert_eq!(
            events[0],
            ActionEvent::PassengersReleased {
                transport: 9,
                passengers: vec![30],
            }
        );
    }

    #[test]
    fn test_call_transport_reports_room() {
        let mut f = fixture();
        let mut unit = plain_unit(9);
        let mut transport = Transport::new(3);
        transport.board(30);
        unit.transport = Some(transport);
        f.selection.units.push(unit);

        let events = dispatch(&mut f, InstantAction::CallTransport).unwrap();
        assert_eq!(
            events[0],
            ActionEvent::TransportCalled {
                transport: 9,
                room: 2,
            }
        );
    }

    #[test]
    fn test_call_full_transport_is_refused() {
        let mut f = fixture();
        let mut unit = plain_unit(9);
        let mut transport = Transport::new(1);
        transport.board(30);
        unit.transport = Some(transport);
        f.selection.units.push(unit);

        // Policy failure, not a structural error: no events, no boarding
        let events = dispatch(&mut f, InstantAction::CallTransport).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_place_building_enters_placement_mode() {
        let mut f = fixture();
        let depot = BuildingTypeId::new(4);

        let events = dispatch(&mut f, InstantAction::PlaceBuilding { building: depot }).unwrap();
        assert_eq!(events[0], ActionEvent::PlacementStarted { building: depot });
        assert_eq!(f.placement.active, Some(depot));
    }

    #[test]
    fn test_place_building_limit_blocks_placement() {
        let mut f = fixture();
        let depot = BuildingTypeId::new(4);
        f.factions
            .get_mut(PLAYER)
            .unwrap()
            .caps
            .set_building_cap(depot, 0);

        let events = dispatch(&mut f, InstantAction::PlaceBuilding { building: depot }).unwrap();
        assert!(events.is_empty());
        assert!(f.placement.active.is_none());
    }

    #[test]
    fn test_toggle_invisibility() {
        let mut f = fixture();
        let mut unit = plain_unit(9);
        unit.invisibility = Some(Invisibility::default());
        f.selection.units.push(unit);

        let events = dispatch(&mut f, InstantAction::ToggleInvisibility).unwrap();
        assert_eq!(
            events[0],
            ActionEvent::InvisibilityToggled {
                unit: 9,
                active: true,
            }
        );
    }

    #[test]
    fn test_select_attack_mode_in_cooldown_is_refused() {
        let mut f = fixture();
        let mut unit = plain_unit(9);
        let mut modes = AttackModes::new(vec![
            AttackMode::new("kinetic", 10),
            AttackMode::new("plasma", 10),
        ]);
        modes.select(1); // kinetic now cooling
        unit.attack_modes = Some(modes);
        f.selection.units.push(unit);

        let events = dispatch(&mut f, InstantAction::SelectAttackMode { mode: 0 }).unwrap();
        assert!(events.is_empty());
        assert_eq!(f.selection.units[0].attack_modes.as_ref().unwrap().active, 1);
    }

    #[test]
    fn test_toggle_wander_anchors_fixed_center() {
        let mut f = fixture();
        let position = Vec2Fixed::new(Fixed::from_num(5), Fixed::from_num(6));
        let mut unit = SelectedUnit::new(9, PLAYER, position);
        unit.wander = Some(Wander::new(true, Fixed::from_num(8)));
        f.selection.units.push(unit);

        let events = dispatch(&mut f, InstantAction::ToggleWander).unwrap();
        assert_eq!(
            events[0],
            ActionEvent::WanderToggled {
                unit: 9,
                active: true,
            }
        );
        let wander = f.selection.units[0].wander.unwrap();
        assert!(wander.active);
        assert_eq!(wander.center, position);
    }

    #[test]
    fn test_upgrade_building_request() {
        let mut f = fixture();
        f.selection.building = Some(SelectedBuilding::new(3, PLAYER));

        let events = dispatch(&mut f, InstantAction::UpgradeBuilding).unwrap();
        assert_eq!(events[0], ActionEvent::BuildingUpgradeRequested { building: 3 });
    }

    #[test]
    fn test_await_target_parks_command() {
        let mut f = fixture();
        let events = dispatch(
            &mut f,
            InstantAction::AwaitTarget {
                kind: TaskKind::Attack,
                icon: IconId(5),
            },
        )
        .unwrap();

        assert_eq!(events[0], ActionEvent::AwaitingTarget { kind: TaskKind::Attack });
        assert_eq!(f.pending.get(), Some((TaskKind::Attack, IconId(5))));

        // A later park replaces the previous command
        dispatch(
            &mut f,
            InstantAction::AwaitTarget {
                kind: TaskKind::Move,
                icon: IconId(6),
            },
        )
        .unwrap();
        assert_eq!(f.pending.take(), Some((TaskKind::Move, IconId(6))));
        assert!(!f.pending.is_pending());
    }
}
