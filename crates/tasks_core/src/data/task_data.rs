//! Task catalogue data structures for data-driven holder definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    HookId, IconId, ResearchSpec, TaskCatalog, TaskKind, TaskSpec, UnitCreationSpec, UnitTypeId,
    UpgradeSpec,
};
use crate::economy::{ResourceCost, ResourceRegistry};
use crate::error::{Result, TaskError};
use crate::math::Fixed;

/// One cost line, referencing a resource by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostData {
    /// Resource name, interned at build time.
    pub resource: String,
    /// Amount charged.
    pub amount: i32,
}

/// One upgrade step of a unit-creation task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeData {
    /// Short description of the upgrade.
    pub description: String,

    /// Icon for the upgrade entry.
    #[serde(default)]
    pub icon: Option<u16>,

    /// Resources required to launch the upgrade.
    #[serde(default)]
    pub costs: Vec<CostData>,

    /// How long the upgrade takes, in ticks.
    pub duration: u32,

    /// Icon that replaces the base task's icon.
    #[serde(default)]
    pub new_icon: Option<u16>,

    /// Description that replaces the base task's description.
    #[serde(default)]
    pub new_description: Option<String>,

    /// Cost list that replaces the base task's (empty = no change).
    #[serde(default)]
    pub new_costs: Vec<CostData>,

    /// Reload that replaces the base task's (0 = no change).
    #[serde(default)]
    pub new_reload: u32,
}

/// Research bonuses, applied to affected unit types on completion.
///
/// Flat amounts; converted to fixed-point at build time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchData {
    /// Movement speed bonus.
    #[serde(default)]
    pub speed_bonus: i32,
    /// Bonus damage vs units.
    #[serde(default)]
    pub unit_damage_bonus: i32,
    /// Bonus damage vs buildings.
    #[serde(default)]
    pub building_damage_bonus: i32,
    /// Attack reload delta (negative = faster).
    #[serde(default)]
    pub attack_reload_delta: i32,
    /// Search range bonus.
    #[serde(default)]
    pub search_range_bonus: i32,
    /// Max health bonus.
    #[serde(default)]
    pub max_health_bonus: i32,
    /// Unit type ids the bonuses apply to.
    #[serde(default)]
    pub affects: Vec<u32>,
}

/// Unit-creation payload of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCreationData {
    /// Candidate unit type ids; the first is the representative.
    pub candidates: Vec<u32>,

    /// Ordered upgrade ladder.
    #[serde(default)]
    pub upgrades: Vec<UpgradeData>,
}

/// Data-driven task definition.
///
/// # Example RON
///
/// ```ron
/// TaskData(
///     id: "train_scout",
///     name: "Train Scout",
///     kind: CreateUnit,
///     costs: [(resource: "wood", amount: 10)],
///     reload: 40,
///     unit_creation: Some((candidates: [1], upgrades: [])),
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    /// Unique string identifier, referenced by `requires`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Description shown in the task panel.
    #[serde(default)]
    pub description: String,

    /// Panel icon.
    #[serde(default)]
    pub icon: Option<u16>,

    /// What the task does.
    pub kind: TaskKind,

    /// Resource cost to launch.
    #[serde(default)]
    pub costs: Vec<CostData>,

    /// Ticks from launch to completion.
    pub reload: u32,

    /// Remove the task after its first launch.
    #[serde(default)]
    pub one_shot: bool,

    /// Unit-creation payload (required for `CreateUnit`).
    #[serde(default)]
    pub unit_creation: Option<UnitCreationData>,

    /// Research payload.
    #[serde(default)]
    pub research: Option<ResearchData>,

    /// Ids of tasks that must be active before this one unlocks.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Host hook fired when the task launches.
    #[serde(default)]
    pub launch_hook: Option<u16>,
}

/// A holder's full catalogue as authored in data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    /// Task definitions in panel order.
    pub tasks: Vec<TaskData>,
}

fn build_costs(costs: &[CostData], resources: &mut ResourceRegistry) -> Vec<ResourceCost> {
    costs
        .iter()
        .map(|c| ResourceCost::new(resources.intern(&c.resource), c.amount))
        .collect()
}

fn build_upgrade(data: &UpgradeData, resources: &mut ResourceRegistry) -> UpgradeSpec {
    UpgradeSpec {
        description: data.description.clone(),
        icon: data.icon.map(IconId),
        costs: build_costs(&data.costs, resources),
        duration: data.duration,
        new_icon: data.new_icon.map(IconId),
        new_description: data.new_description.clone(),
        new_costs: build_costs(&data.new_costs, resources),
        new_reload: data.new_reload,
    }
}

fn build_research(data: &ResearchData) -> ResearchSpec {
    ResearchSpec {
        speed_bonus: Fixed::from_num(data.speed_bonus),
        unit_damage_bonus: Fixed::from_num(data.unit_damage_bonus),
        building_damage_bonus: Fixed::from_num(data.building_damage_bonus),
        attack_reload_delta: Fixed::from_num(data.attack_reload_delta),
        search_range_bonus: Fixed::from_num(data.search_range_bonus),
        max_health_bonus: data.max_health_bonus,
        affects: data.affects.iter().copied().map(UnitTypeId).collect(),
    }
}

/// Check a single task definition's internal consistency.
fn check_task(data: &TaskData) -> Result<()> {
    if data.reload == 0 {
        return Err(TaskError::InvalidData(format!(
            "task '{}' has zero reload",
            data.id
        )));
    }
    if data.costs.iter().any(|c| c.amount < 0) {
        return Err(TaskError::InvalidData(format!(
            "task '{}' has a negative cost",
            data.id
        )));
    }
    match (&data.kind, &data.unit_creation) {
        (TaskKind::CreateUnit, None) => {
            return Err(TaskError::InvalidData(format!(
                "unit-creation task '{}' has no unit payload",
                data.id
            )));
        }
        (TaskKind::CreateUnit, Some(creation)) if creation.candidates.is_empty() => {
            return Err(TaskError::InvalidData(format!(
                "unit-creation task '{}' has no candidates",
                data.id
            )));
        }
        _ => {}
    }
    if let Some(creation) = &data.unit_creation {
        if creation.upgrades.iter().any(|u| u.duration == 0) {
            return Err(TaskError::InvalidData(format!(
                "task '{}' has a zero-duration upgrade",
                data.id
            )));
        }
    }
    Ok(())
}

/// Build a runtime catalogue from authored data.
///
/// String ids become generated [`crate::catalog::TaskKey`]s; resource names
/// are interned into `resources`; `requires` references are resolved across
/// the catalogue.
///
/// # Errors
///
/// Returns [`TaskError::InvalidData`] for duplicate ids, unresolved
/// `requires` references, zero durations, negative costs, or unit-creation
/// tasks without candidates.
pub fn build_catalog(data: &CatalogData, resources: &mut ResourceRegistry) -> Result<TaskCatalog> {
    let mut catalog = TaskCatalog::new();
    let mut keys = HashMap::new();

    for task in &data.tasks {
        check_task(task)?;
        if keys.contains_key(task.id.as_str()) {
            return Err(TaskError::InvalidData(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }

        let mut spec = TaskSpec::new(
            task.name.clone(),
            task.kind,
            build_costs(&task.costs, resources),
            task.reload,
        );
        spec.description = task.description.clone();
        spec.icon = task.icon.map(IconId);
        spec.one_shot = task.one_shot;
        spec.launch_hook = task.launch_hook.map(HookId);
        if let Some(creation) = &task.unit_creation {
            spec.unit_creation = Some(
                UnitCreationSpec::new(
                    creation.candidates.iter().copied().map(UnitTypeId).collect(),
                )
                .with_upgrades(
                    creation
                        .upgrades
                        .iter()
                        .map(|u| build_upgrade(u, resources))
                        .collect(),
                ),
            );
        }
        if let Some(research) = &task.research {
            spec.research = Some(build_research(research));
        }

        let key = catalog.add(spec);
        keys.insert(task.id.as_str(), key);
    }

    // Second pass: resolve prerequisite references
    for task in &data.tasks {
        if task.requires.is_empty() {
            continue;
        }
        let mut requires = Vec::with_capacity(task.requires.len());
        for req in &task.requires {
            let key = keys.get(req.as_str()).ok_or_else(|| {
                TaskError::InvalidData(format!(
                    "task '{}' requires unknown task '{req}'",
                    task.id
                ))
            })?;
            requires.push(*key);
        }
        let key = keys[task.id.as_str()];
        if let Some(spec) = catalog.get_mut(key) {
            spec.requires = requires;
        }
    }
    catalog.refresh_unlocks();

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_RON: &str = r#"
        (
            tasks: [
                (
                    id: "train_scout",
                    name: "Train Scout",
                    kind: CreateUnit,
                    costs: [(resource: "wood", amount: 10)],
                    reload: 40,
                    unit_creation: Some((
                        candidates: [1],
                        upgrades: [(
                            description: "Mk2 optics",
                            costs: [(resource: "wood", amount: 30)],
                            duration: 60,
                            new_costs: [(resource: "wood", amount: 8)],
                            new_reload: 25,
                        )],
                    )),
                ),
                (
                    id: "field_optics",
                    name: "Field Optics",
                    kind: Research,
                    costs: [(resource: "alloy", amount: 25)],
                    reload: 60,
                    research: Some((speed_bonus: 1, affects: [1])),
                ),
                (
                    id: "advanced_optics",
                    name: "Advanced Optics",
                    kind: Research,
                    costs: [(resource: "alloy", amount: 50)],
                    reload: 90,
                    requires: ["field_optics"],
                ),
            ],
        )
    "#;

    #[test]
    fn test_build_catalog_from_ron() {
        let data: CatalogData = ron::from_str(CATALOG_RON).unwrap();
        let mut resources = ResourceRegistry::new();
        let catalog = build_catalog(&data, &mut resources).unwrap();

        assert_eq!(catalog.len(), 3);
        let keys: Vec<_> = catalog.keys().collect();

        let train = catalog.get(keys[0]).unwrap();
        assert_eq!(train.name, "Train Scout");
        assert_eq!(train.kind, TaskKind::CreateUnit);
        assert_eq!(train.costs[0].resource, resources.id_of("wood").unwrap());
        assert_eq!(
            train.unit_creation.as_ref().unwrap().representative(),
            Some(UnitTypeId(1))
        );
        assert_eq!(train.current_upgrade().unwrap().duration, 60);

        // Prerequisites resolved and unlock state computed
        let advanced = catalog.get(keys[2]).unwrap();
        assert_eq!(advanced.requires, vec![keys[1]]);
        assert!(!advanced.unlocked);
        assert!(catalog.get(keys[1]).unwrap().unlocked);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let data = CatalogData {
            tasks: vec![
                TaskData {
                    id: "x".into(),
                    name: "X".into(),
                    description: String::new(),
                    icon: None,
                    kind: TaskKind::Custom,
                    costs: vec![],
                    reload: 10,
                    one_shot: false,
                    unit_creation: None,
                    research: None,
                    requires: vec![],
                    launch_hook: None,
                },
                TaskData {
                    id: "x".into(),
                    name: "X again".into(),
                    description: String::new(),
                    icon: None,
                    kind: TaskKind::Custom,
                    costs: vec![],
                    reload: 10,
                    one_shot: false,
                    unit_creation: None,
                    research: None,
                    requires: vec![],
                    launch_hook: None,
                },
            ],
        };
        let mut resources = ResourceRegistry::new();
        assert!(matches!(
            build_catalog(&data, &mut resources),
            Err(TaskError::InvalidData(_))
        ));
    }

    #[test]
    fn test_unknown_requires_rejected() {
        let data = CatalogData {
            tasks: vec![TaskData {
                id: "x".into(),
                name: "X".into(),
                description: String::new(),
                icon: None,
                kind: TaskKind::Custom,
                costs: vec![],
                reload: 10,
                one_shot: false,
                unit_creation: None,
                research: None,
                requires: vec!["missing".into()],
                launch_hook: None,
            }],
        };
        let mut resources = ResourceRegistry::new();
        let err = build_catalog(&data, &mut resources).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_create_unit_without_candidates_rejected() {
        let data = CatalogData {
            tasks: vec![TaskData {
                id: "ghost".into(),
                name: "Ghost".into(),
                description: String::new(),
                icon: None,
                kind: TaskKind::CreateUnit,
                costs: vec![],
                reload: 10,
                one_shot: false,
                unit_creation: Some(UnitCreationData {
                    candidates: vec![],
                    upgrades: vec![],
                }),
                research: None,
                requires: vec![],
                launch_hook: None,
            }],
        };
        let mut resources = ResourceRegistry::new();
        assert!(build_catalog(&data, &mut resources).is_err());
    }

    #[test]
    fn test_zero_reload_rejected() {
        let data = CatalogData {
            tasks: vec![TaskData {
                id: "x".into(),
                name: "X".into(),
                description: String::new(),
                icon: None,
                kind: TaskKind::Custom,
                costs: vec![],
                reload: 0,
                one_shot: false,
                unit_creation: None,
                research: None,
                requires: vec![],
                launch_hook: None,
            }],
        };
        let mut resources = ResourceRegistry::new();
        assert!(build_catalog(&data, &mut resources).is_err());
    }
}
