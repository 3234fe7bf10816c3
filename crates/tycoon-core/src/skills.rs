//! The research tree: seeded skill table, derived skill states, and
//! prerequisite-graph validation.
//!
//! Skills are data ([`Skill`] in `tycoon-types`); this module owns the
//! seeded table both scenarios share, the [`SkillState`] derivation the
//! API reports to clients, and the DAG checks that run at startup and on
//! every loaded document. Unlocking itself lives with the other command
//! handlers in [`crate::commands`].

use std::collections::BTreeMap;

use tycoon_types::{Modifier, Skill, SkillId, SkillState};

/// Errors found in a skill prerequisite graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillGraphError {
    /// A skill names a prerequisite that is not in the table.
    #[error("skill '{skill}' requires unknown skill '{prerequisite}'")]
    UnknownPrerequisite {
        /// The skill carrying the bad reference.
        skill: SkillId,
        /// The missing prerequisite.
        prerequisite: SkillId,
    },

    /// The prerequisite graph contains a cycle, so some skills can never
    /// be unlocked.
    #[error("skill '{skill}' is part of a prerequisite cycle")]
    Cycle {
        /// A skill on the cycle.
        skill: SkillId,
    },
}

/// Helper to build a locked [`Skill`] table entry.
fn skill(
    id: &str,
    name: &str,
    cost: u64,
    effect: Modifier,
    prerequisites: &[&str],
    description: &str,
) -> Skill {
    Skill {
        id: SkillId::from(id),
        name: name.to_owned(),
        description: description.to_owned(),
        cost,
        effect,
        prerequisites: prerequisites.iter().map(|p| SkillId::from(*p)).collect(),
        unlocked: false,
    }
}

/// Helper to build a power-boost modifier.
fn boost(building: &str, fraction: f64) -> Modifier {
    Modifier::BuildingPowerBoost {
        building: building.into(),
        fraction,
    }
}

/// The seeded research tree, shared by both scenarios.
///
/// Three boost families (wind, solar, hydro) plus one global cost
/// reduction at the end of the hydro chain. Keeping a single reduction in
/// the table means at most one can ever be active, so the first-match
/// rule in cost application never has to arbitrate.
pub fn seeded_skills() -> BTreeMap<SkillId, Skill> {
    let entries = [
        skill(
            "improved_blades",
            "Improved Blades",
            5,
            boost("wind_turbine", 0.1),
            &[],
            "Lighter composite blades squeeze more from every gust.",
        ),
        skill(
            "carbon_rotors",
            "Carbon Rotors",
            15,
            boost("wind_turbine", 0.25),
            &["improved_blades"],
            "Rigid carbon rotors rated for storm winds.",
        ),
        skill(
            "tracking_mounts",
            "Tracking Mounts",
            5,
            boost("solar_panel", 0.1),
            &[],
            "Panels that follow the sun across the sky.",
        ),
        skill(
            "perovskite_cells",
            "Perovskite Cells",
            15,
            boost("solar_panel", 0.25),
            &["tracking_mounts"],
            "Next-generation cells with a wider absorption band.",
        ),
        skill(
            "turbine_tuning",
            "Turbine Tuning",
            10,
            boost("hydro_plant", 0.15),
            &[],
            "Precision-balanced runners cut friction losses.",
        ),
        skill(
            "bulk_contracts",
            "Bulk Contracts",
            20,
            Modifier::GlobalCostReduction { fraction: 0.1 },
            &["turbine_tuning"],
            "Negotiated supply lines shave every construction bill.",
        ),
    ];
    entries
        .into_iter()
        .map(|entry| (entry.id.clone(), entry))
        .collect()
}

/// Derive the lifecycle state of one skill from the table and the
/// player's research points.
///
/// `Unlocked` is terminal; otherwise a skill is `Unlockable` exactly when
/// every prerequisite is unlocked and the points cover the cost. A
/// prerequisite missing from the table counts as locked (validation
/// rejects such tables before play, but loaded documents pass through
/// here regardless).
pub fn skill_state(
    entry: &Skill,
    skills: &BTreeMap<SkillId, Skill>,
    research_points: u64,
) -> SkillState {
    if entry.unlocked {
        return SkillState::Unlocked;
    }
    let prerequisites_met = entry
        .prerequisites
        .iter()
        .all(|id| skills.get(id).is_some_and(|s| s.unlocked));
    if prerequisites_met && research_points >= entry.cost {
        SkillState::Unlockable
    } else {
        SkillState::Locked
    }
}

/// Validate the structural invariants of a skill table before play.
///
/// Catches unknown prerequisites and prerequisite cycles. Runs against
/// the seeded table at startup (failure aborts) and against loaded
/// documents (failure falls back to a fresh game).
pub fn validate_skills(skills: &BTreeMap<SkillId, Skill>) -> Result<(), SkillGraphError> {
    let mut marks: BTreeMap<&SkillId, Mark> = BTreeMap::new();
    for id in skills.keys() {
        visit(id, skills, &mut marks)?;
    }
    Ok(())
}

/// Depth-first visit state for cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path; revisiting means a cycle.
    InProgress,
    /// Fully explored, known acyclic.
    Done,
}

fn visit<'a>(
    id: &'a SkillId,
    skills: &'a BTreeMap<SkillId, Skill>,
    marks: &mut BTreeMap<&'a SkillId, Mark>,
) -> Result<(), SkillGraphError> {
    match marks.get(id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            return Err(SkillGraphError::Cycle { skill: id.clone() });
        }
        None => {}
    }
    let Some(entry) = skills.get(id) else {
        // Only reachable through a dangling prerequisite; reported by the
        // caller with both ends of the edge.
        return Ok(());
    };
    marks.insert(id, Mark::InProgress);
    for prerequisite in &entry.prerequisites {
        if !skills.contains_key(prerequisite) {
            return Err(SkillGraphError::UnknownPrerequisite {
                skill: id.clone(),
                prerequisite: prerequisite.clone(),
            });
        }
        visit(prerequisite, skills, marks)?;
    }
    marks.insert(id, Mark::Done);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn table_with(entries: Vec<Skill>) -> BTreeMap<SkillId, Skill> {
        entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect()
    }

    #[test]
    fn seeded_table_validates() {
        let skills = seeded_skills();
        assert!(validate_skills(&skills).is_ok());
        assert_eq!(skills.len(), 6);
    }

    #[test]
    fn seeded_table_has_one_cost_reduction() {
        let reductions = seeded_skills()
            .values()
            .filter(|s| matches!(s.effect, Modifier::GlobalCostReduction { .. }))
            .count();
        assert_eq!(reductions, 1);
    }

    #[test]
    fn root_skill_is_unlockable_once_affordable() {
        let skills = seeded_skills();
        let blades = skills.get(&SkillId::from("improved_blades")).unwrap();
        assert_eq!(skill_state(blades, &skills, 0), SkillState::Locked);
        assert_eq!(skill_state(blades, &skills, 5), SkillState::Unlockable);
    }

    #[test]
    fn dependent_skill_stays_locked_until_prerequisite_unlocks() {
        let mut skills = seeded_skills();
        let rotors_id = SkillId::from("carbon_rotors");
        let rotors = skills.get(&rotors_id).unwrap().clone();
        // Affordable but gated.
        assert_eq!(skill_state(&rotors, &skills, 100), SkillState::Locked);

        skills
            .get_mut(&SkillId::from("improved_blades"))
            .unwrap()
            .unlocked = true;
        assert_eq!(skill_state(&rotors, &skills, 100), SkillState::Unlockable);
        assert_eq!(skill_state(&rotors, &skills, 1), SkillState::Locked);
    }

    #[test]
    fn unlocked_state_is_terminal() {
        let mut skills = seeded_skills();
        skills
            .get_mut(&SkillId::from("improved_blades"))
            .unwrap()
            .unlocked = true;
        let blades = skills.get(&SkillId::from("improved_blades")).unwrap();
        assert_eq!(skill_state(blades, &skills, 0), SkillState::Unlocked);
    }

    #[test]
    fn validation_rejects_unknown_prerequisite() {
        let skills = table_with(vec![skill(
            "orphan",
            "Orphan",
            1,
            boost("wind_turbine", 0.1),
            &["missing"],
            "",
        )]);
        let result = validate_skills(&skills);
        assert!(matches!(
            result,
            Err(SkillGraphError::UnknownPrerequisite { skill, prerequisite })
                if skill.as_str() == "orphan" && prerequisite.as_str() == "missing"
        ));
    }

    #[test]
    fn validation_rejects_cycles() {
        let skills = table_with(vec![
            skill("a", "A", 1, boost("wind_turbine", 0.1), &["b"], ""),
            skill("b", "B", 1, boost("wind_turbine", 0.1), &["a"], ""),
        ]);
        assert!(matches!(
            validate_skills(&skills),
            Err(SkillGraphError::Cycle { .. })
        ));
    }

    #[test]
    fn validation_rejects_self_cycle() {
        let skills = table_with(vec![skill(
            "narcissus",
            "Narcissus",
            1,
            boost("solar_panel", 0.1),
            &["narcissus"],
            "",
        )]);
        assert!(matches!(
            validate_skills(&skills),
            Err(SkillGraphError::Cycle { skill }) if skill.as_str() == "narcissus"
        ));
    }
}
