//! Key tables that drive field classification.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// How the walker treats a field of a behavior node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// `behaviorID` / `behaviorName`
    Identity,
    /// `behaviorClass`
    Category,
    /// Animation trigger names, linked as usages
    Trigger,
    /// Other behaviors, by id or embedded as full nodes
    SubBehavior,
    /// Condition trees
    Condition,
    /// Anything else
    Plain,
}

const TRIGGER_KEYS: &[&str] = &[
    "animationAfterDrive",
    "animGroupGetin",
    "animWhenSeesFace",
    "drivingStartAnimTrigger",
    "drivingEndAnimTrigger",
    "drivingLoopAnimTrigger",
    "emergencyGetOut",
    "emergencyGetOutAnimation",
    "getIn",
    "getInAnimation",
    "getOut",
    "getoutAnimTrigger",
    "knowNameAnimation",
    "leftTurnAnimTrigger",
    "loopAnimation",
    "nuzzleAnimTrigger",
    "pickupAnimTrigger",
    "postSearchAnimTrigger",
    "powerOnAnimName",
    "powerOffAnimName",
    "searchTurnAnimTrigger",
    "rightTurnAnimTrigger",
    "raiseLiftAnimTrigger",
    "requestAnimTrigger",
    "waitLoopAnimTrigger",
    "onTreadsTimeCondition",
    "wantsToBeActivatedCondition",
    "wantsToCancelSelfCondition",
];

const SUB_BEHAVIOR_KEYS: &[&str] = &[
    "askForHelpBehavior",
    "behavior",
    "behaviorOnIntent",
    "delegateID",
    "delegateBehaviorID",
    "driveOffChargerBehavior",
    "findFaceBehavior",
    "followUpBehaviorID",
    "getInBehavior",
    "goToChargerBehavior",
    "listeningBehavior",
    "longListeningBehavior",
    "micDirectionReactionBehavior",
    "offChargerDancingBehavior",
    "onChargerDancingBehavior",
    "postBehaviorSuggestion",
    "searchBehavior",
    "searchForChargerBehavior",
    "searchForFaceBehavior",
    "anonymousBehaviors",
];

const CONDITION_KEYS: &[&str] = &[
    "onTreadsTimeCondition",
    "wantsToBeActivatedCondition",
    "wantsToCancelSelfCondition",
    "emergencyCondition",
    "wakeReasonConditions",
];

/// Domain constants for the behavior walker.
///
/// [`BehaviorSchema::default`] describes the robot behavior configuration
/// format; a caller indexing a different format supplies its own tables.
#[derive(Debug, Clone)]
pub struct BehaviorSchema {
    /// Identity key of globally addressable behaviors
    pub id_key: SmolStr,
    /// Identity key of anonymous (embedded) behaviors
    pub name_key: SmolStr,
    pub class_key: SmolStr,
    /// Category every behavior class derives from
    pub root_class: SmolStr,
    /// Key naming the type of a condition clause
    pub condition_type_key: SmolStr,
    /// Keys combining condition clauses (`and`, `or`, `not`)
    pub combinator_keys: Vec<SmolStr>,
    /// Language tag recorded for indexed files
    pub language: SmolStr,
    roles: FxHashMap<SmolStr, Vec<FieldRole>>,
}

impl Default for BehaviorSchema {
    fn default() -> Self {
        let mut schema = Self {
            id_key: SmolStr::new_static("behaviorID"),
            name_key: SmolStr::new_static("behaviorName"),
            class_key: SmolStr::new_static("behaviorClass"),
            root_class: SmolStr::new_static("ICozmoBehavior"),
            condition_type_key: SmolStr::new_static("conditionType"),
            combinator_keys: ["and", "or", "not"].into_iter().map(SmolStr::new_static).collect(),
            language: SmolStr::new_static("JSON"),
            roles: FxHashMap::default(),
        };
        schema.assign(TRIGGER_KEYS.iter().copied(), FieldRole::Trigger);
        schema.assign(SUB_BEHAVIOR_KEYS.iter().copied(), FieldRole::SubBehavior);
        schema.add_role(CONDITION_KEYS.iter().copied(), FieldRole::Condition);
        schema
    }
}

impl BehaviorSchema {
    /// Classify `keys` as `role` only, replacing any earlier classification.
    pub fn assign<I, K>(&mut self, keys: I, role: FieldRole) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SmolStr>,
    {
        for key in keys {
            self.roles.insert(key.into(), vec![role]);
        }
        self
    }

    /// Give `keys` the additional role `role`. A key with several roles is
    /// handled once per role, in field-pass order.
    pub fn add_role<I, K>(&mut self, keys: I, role: FieldRole) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SmolStr>,
    {
        for key in keys {
            let roles = self.roles.entry(key.into()).or_default();
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        self
    }

    /// Roles of `key`. Keys without a classification are [`FieldRole::Plain`].
    pub fn roles(&self, key: &str) -> &[FieldRole] {
        if self.id_key == key || self.name_key == key {
            return &[FieldRole::Identity];
        }
        if self.class_key == key {
            return &[FieldRole::Category];
        }
        match self.roles.get(key) {
            Some(roles) if !roles.is_empty() => roles.as_slice(),
            _ => &[FieldRole::Plain],
        }
    }

    pub fn has_role(&self, key: &str, role: FieldRole) -> bool {
        self.roles(key).contains(&role)
    }

    /// Keys carrying `role`, in no particular order
    pub fn keys(&self, role: FieldRole) -> impl Iterator<Item = &str> {
        self.roles
            .iter()
            .filter(move |(_, roles)| roles.contains(&role))
            .map(|(k, _)| k.as_str())
    }

    /// Whether `key` inside a condition tree names a condition clause type,
    /// i.e. it is neither the type key nor a combinator.
    pub fn is_clause_key(&self, key: &str) -> bool {
        self.condition_type_key != key && !self.combinator_keys.iter().any(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("behaviorID", FieldRole::Identity)]
    #[case("behaviorName", FieldRole::Identity)]
    #[case("behaviorClass", FieldRole::Category)]
    #[case("getIn", FieldRole::Trigger)]
    #[case("getInBehavior", FieldRole::SubBehavior)]
    #[case("anonymousBehaviors", FieldRole::SubBehavior)]
    #[case("emergencyCondition", FieldRole::Condition)]
    #[case("cooldownTime_s", FieldRole::Plain)]
    fn test_default_roles(#[case] key: &str, #[case] role: FieldRole) {
        assert_eq!(BehaviorSchema::default().roles(key), &[role]);
    }

    #[rstest]
    #[case("onTreadsTimeCondition")]
    #[case("wantsToBeActivatedCondition")]
    #[case("wantsToCancelSelfCondition")]
    fn test_condition_keys_also_trigger(#[case] key: &str) {
        assert_eq!(
            BehaviorSchema::default().roles(key),
            &[FieldRole::Trigger, FieldRole::Condition]
        );
    }

    #[test]
    fn test_key_counts_per_role() {
        let schema = BehaviorSchema::default();
        assert_eq!(schema.keys(FieldRole::Trigger).count(), TRIGGER_KEYS.len());
        assert_eq!(schema.keys(FieldRole::SubBehavior).count(), SUB_BEHAVIOR_KEYS.len());
        assert_eq!(schema.keys(FieldRole::Condition).count(), CONDITION_KEYS.len());
    }

    #[test]
    fn test_assign_reclassifies() {
        let mut schema = BehaviorSchema::default();
        schema.assign(["getIn", "customAnim"], FieldRole::Plain);
        schema.assign(["customAnim"], FieldRole::Trigger);
        assert_eq!(schema.roles("getIn"), &[FieldRole::Plain]);
        assert_eq!(schema.roles("customAnim"), &[FieldRole::Trigger]);
    }

    #[rstest]
    #[case("conditionType", false)]
    #[case("and", false)]
    #[case("or", false)]
    #[case("not", false)]
    #[case("timeout", true)]
    fn test_clause_keys(#[case] key: &str, #[case] clause: bool) {
        assert_eq!(BehaviorSchema::default().is_clause_key(key), clause);
    }
}
