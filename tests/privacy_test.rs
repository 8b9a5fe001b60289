#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use gedkin::{
        AccessLevel, EngineConfig, FactScope, KeepAliveRule, MemoryStore, RecordStore, Sex,
        VisibilityEvaluator,
    };

    const LEVELS: [AccessLevel; 5] = [
        AccessLevel::Visitor,
        AccessLevel::Member,
        AccessLevel::Editor,
        AccessLevel::Manager,
        AccessLevel::Administrator,
    ];

    fn today() -> NaiveDate {
        let _ = env_logger::builder().is_test(true).try_init();
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn dead_forty_years_is_disclosed_to_visitors() {
        let store = MemoryStore::parse("0 @I1@ INDI\n1 DEAT\n2 DATE 1985\n");
        let config = EngineConfig::default();
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        assert!(evaluator.is_dead(&person).unwrap());
        assert!(evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
    }

    #[test]
    fn keep_alive_window_hides_a_recently_dead_person() {
        let store = MemoryStore::parse("0 @I1@ INDI\n1 DEAT\n2 DATE 1985\n");
        let config = EngineConfig {
            keep_alive_years_death: Some(50),
            ..EngineConfig::default()
        };
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        // Dead, but the death is within the window: treated as living
        assert!(evaluator.is_dead(&person).unwrap());
        assert!(!evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
        assert!(evaluator.can_show_person(&person, AccessLevel::Member).unwrap());
    }

    #[test]
    fn recent_birth_keep_alive_window_hides_a_dead_person() {
        // Explicit death, but a birth fact within the keep-alive window
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 BIRT\n2 DATE 2000\n1 DEAT\n2 DATE 2010\n",
        );
        let config = EngineConfig {
            keep_alive_years_birth: Some(30),
            ..EngineConfig::default()
        };
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        assert!(!evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
    }

    #[test]
    fn keep_alive_precedence_is_an_explicit_configuration_rule() {
        // Death window triggers (1985 + 50 > 2025), birth window does not
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 BIRT\n2 DATE 1900\n1 DEAT\n2 DATE 1985\n",
        );
        let any = EngineConfig {
            keep_alive_years_birth: Some(30),
            keep_alive_years_death: Some(50),
            keep_alive_rule: KeepAliveRule::AnyWindow,
            ..EngineConfig::default()
        };
        let both = EngineConfig {
            keep_alive_rule: KeepAliveRule::BothWindows,
            ..any.clone()
        };
        let person = store.person("I1").unwrap().unwrap();

        let evaluator = VisibilityEvaluator::new(&store, &any, today()).unwrap();
        assert!(!evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());

        let evaluator = VisibilityEvaluator::new(&store, &both, today()).unwrap();
        assert!(evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
    }

    #[test]
    fn disclosure_is_monotonic_without_an_explicit_override() {
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 BIRT\n2 DATE 2000\n\
             0 @I2@ INDI\n1 DEAT\n2 DATE 1900\n",
        );
        let config = EngineConfig::default();
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        for xref in ["I1", "I2"] {
            let person = store.person(xref).unwrap().unwrap();
            let mut seen_allowed = false;
            for level in LEVELS {
                let allowed = evaluator.can_show_person(&person, level).unwrap();
                assert!(
                    allowed || !seen_allowed,
                    "{xref}: disclosure revoked at higher level {level:?}"
                );
                seen_allowed = seen_allowed || allowed;
            }
        }
    }

    #[test]
    fn explicit_restriction_overrides_in_both_directions() {
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 BIRT\n2 DATE 2000\n1 RESN none\n\
             0 @I2@ INDI\n1 DEAT\n2 DATE 1900\n1 RESN confidential\n",
        );
        let config = EngineConfig::default();
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();

        // A living person with `RESN none` is visible even to visitors
        let granted = store.person("I1").unwrap().unwrap();
        assert!(evaluator.can_show_person(&granted, AccessLevel::Visitor).unwrap());

        // A long-dead person with `RESN confidential` stays hidden below manager
        let denied = store.person("I2").unwrap().unwrap();
        assert!(!evaluator.can_show_person(&denied, AccessLevel::Editor).unwrap());
        assert!(evaluator.can_show_person(&denied, AccessLevel::Manager).unwrap());
    }

    #[test]
    fn ancestor_heuristic_infers_death_for_an_undated_child() {
        // Parent died 75 years ago; with a 25-year lifespan assumption the
        // parent horizon (lifespan + 45) is exceeded
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 FAMC @F1@\n\
             0 @I2@ INDI\n1 DEAT\n2 DATE 1950\n1 FAMS @F1@\n\
             0 @F1@ FAM\n1 HUSB @I2@\n1 CHIL @I1@\n",
        );
        let config = EngineConfig {
            max_alive_age_years: 25,
            ..EngineConfig::default()
        };
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        assert!(evaluator.is_dead(&person).unwrap());
        assert!(evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
    }

    #[test]
    fn recent_dated_birth_means_alive() {
        let store = MemoryStore::parse("0 @I1@ INDI\n1 BIRT\n2 DATE 2000\n");
        let config = EngineConfig::default();
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        assert!(!evaluator.is_dead(&person).unwrap());
        assert!(!evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
        assert!(evaluator.can_show_person(&person, AccessLevel::Member).unwrap());
    }

    #[test]
    fn relationship_gate_discloses_close_relatives_at_member_level() {
        // V's child P is living; Q is an unrelated living person
        let store = MemoryStore::parse(
            "0 @V1@ INDI\n1 FAMS @F1@\n\
             0 @P1@ INDI\n1 BIRT\n2 DATE 2000\n1 FAMC @F1@\n\
             0 @Q1@ INDI\n1 BIRT\n2 DATE 2000\n\
             0 @F1@ FAM\n1 HUSB @V1@\n1 CHIL @P1@\n",
        );
        let config = EngineConfig {
            relationship_privacy: Some(1),
            min_living_access: AccessLevel::Editor,
            ..EngineConfig::default()
        };
        let evaluator = VisibilityEvaluator::new(&store, &config, today())
            .unwrap()
            .with_viewer("V1");

        let child = store.person("P1").unwrap().unwrap();
        assert!(evaluator.can_show_person(&child, AccessLevel::Member).unwrap());
        // The gate applies at member level only
        assert!(!evaluator.can_show_person(&child, AccessLevel::Visitor).unwrap());

        // Outside the circle: falls through to the default minimum level
        let stranger = store.person("Q1").unwrap().unwrap();
        assert!(!evaluator.can_show_person(&stranger, AccessLevel::Member).unwrap());
        assert!(evaluator.can_show_person(&stranger, AccessLevel::Editor).unwrap());
    }

    #[test]
    fn redacted_view_preserves_structure_and_hides_the_rest() {
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n\
             1 BIRT\n2 DATE 2000\n1 FAMS @F1@\n\
             0 @F1@ FAM\n1 HUSB @I1@\n",
        );
        let config = EngineConfig {
            show_living_names: AccessLevel::Administrator,
            ..EngineConfig::default()
        };
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();

        let stub = evaluator.redacted_view(&person, AccessLevel::Visitor).unwrap();
        assert_eq!(stub.xref, "I1");
        assert_eq!(stub.names, vec!["Private".to_string()]);
        assert_eq!(stub.sex, Sex::Unknown);
        assert_eq!(stub.family_links.len(), 1);
        assert_eq!(stub.family_links[0].xref, "F1");
        assert_eq!(stub.date_label, "Private");

        let text = stub.to_record_text();
        assert!(text.contains("1 NAME Private"));
        assert!(text.contains("1 FAMS @F1@"));
        assert!(!text.contains("Smith"));
        assert!(!text.contains("2000"));
    }

    #[test]
    fn name_gate_is_independent_of_the_general_gate() {
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 NAME John /Smith/\n1 BIRT\n2 DATE 2000\n",
        );
        // Names of living people shown to everyone, records to members
        let config = EngineConfig {
            show_living_names: AccessLevel::Visitor,
            ..EngineConfig::default()
        };
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        assert!(!evaluator.can_show_person(&person, AccessLevel::Visitor).unwrap());
        assert!(evaluator.can_show_name(&person, AccessLevel::Visitor).unwrap());

        let stub = evaluator.redacted_view(&person, AccessLevel::Visitor).unwrap();
        assert_eq!(stub.names, vec!["John Smith".to_string()]);
    }

    #[test]
    fn fact_level_restriction_wins_over_the_record_answer() {
        let store = MemoryStore::parse(
            "0 @I1@ INDI\n1 BIRT\n2 DATE 2000\n1 OCCU Blacksmith\n2 RESN none\n",
        );
        let config = EngineConfig::default();
        let evaluator = VisibilityEvaluator::new(&store, &config, today()).unwrap();
        let person = store.person("I1").unwrap().unwrap();
        assert!(!evaluator
            .can_disclose(&person, AccessLevel::Visitor, FactScope::All)
            .unwrap());
        assert!(evaluator
            .can_disclose(&person, AccessLevel::Visitor, FactScope::Fact("OCCU"))
            .unwrap());
    }

    #[test]
    fn invalid_configuration_fails_before_any_query() {
        let store = MemoryStore::new();
        let config = EngineConfig {
            max_alive_age_years: 0,
            ..EngineConfig::default()
        };
        assert!(VisibilityEvaluator::new(&store, &config, today()).is_err());
    }
}
