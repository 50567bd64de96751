use std::sync::Arc;
use chrono::{Duration, Utc};
use learnpath_lib::config::EngineConfig;
use learnpath_lib::modules::{Module, ModuleDifficulty, StaticCatalog};
use learnpath_lib::profile::{Difficulty, Pace};
use learnpath_lib::state::DEFAULT_PRUNE_THRESHOLD;
use learnpath_lib::store::{LearnerStore, MemoryStore};
use learnpath_lib::{Engine, Performance, RecommendationContext};

fn catalog() -> Vec<Module> {
    vec![
        Module::new("intro-syntax", &["basic-syntax"]).with_title("Hello, syntax"),
        Module::new("vars", &["variables", "data-types"]).with_title("Variables and types"),
        Module::new("control-flow", &["operators", "conditionals"])
            .with_title("Making decisions")
            .with_duration(1500.0),
        Module::new("loops-101", &["loops"]).with_description("Iterate with for and while"),
        Module::new("numbers", &["arithmetic"])
            .with_title("Arithmetic warmup")
            .with_duration(200.0),
        Module::new("capstone", &["data-structures", "algorithms", "classes", "recursion"])
            .with_difficulty(ModuleDifficulty::Named("expert".into()))
            .with_duration(5400.0),
        Module::new("placeholder", &[]),
    ]
}

fn engine() -> Engine<MemoryStore, StaticCatalog> {
    Engine::new(MemoryStore::new(), StaticCatalog::new(catalog()), EngineConfig::default())
}

fn completed(score: f64, secs: f64) -> Performance {
    Performance { completed: true, score, time_taken_seconds: secs }
}

#[tokio::test]
async fn test_fresh_learner_is_created_lazily() {
    let store = MemoryStore::new();
    let engine = Engine::new(store.clone(), StaticCatalog::new(catalog()), EngineConfig::default());

    let profile = engine.get_learner_profile("learner-1").await.unwrap();
    assert_eq!(profile.total_attempted, 0);
    let tree = engine.get_skill_tree("learner-1").await.unwrap();
    assert_eq!(tree.len(), 25);

    assert_eq!(store.profile_count(), 1);
    assert_eq!(store.graph_count(), 1);
}

#[tokio::test]
async fn test_recommend_fresh_learner() {
    let engine = engine();
    let recs = engine.recommend("learner-1", 5).await.unwrap();

    assert!(!recs.is_empty());
    assert!(recs.len() <= 5);
    assert!(recs.iter().all(|r| r.score > 0.0));
    assert!(recs.iter().all(|r| r.module.id != "placeholder"));
    for pair in recs.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(engine.metrics().recommendations_served, recs.len() as u64);
}

#[tokio::test]
async fn test_process_completion_updates_profile_and_skills() {
    let engine = engine();
    let module = Module::new("loops-101", &["loops"]);

    let result = engine
        .process_completion("learner-1", &module, completed(80.0, 300.0))
        .await
        .unwrap();

    assert_eq!(result.completion.module_id, "loops-101");
    assert_eq!(result.completion.skills_updated.len(), 1);
    assert!((result.completion.skills_updated[0].after - 24.0).abs() < 1e-9);
    assert_eq!(result.analysis.profile.total_attempted, 1);
    assert_eq!(result.analysis.profile.total_completed, 1);
    assert!(result.analysis.top_recommendations.len() <= 3);

    let tree = engine.get_skill_tree("learner-1").await.unwrap();
    let loops = tree.get("loops").unwrap();
    assert!((loops.proficiency - 24.0).abs() < 1e-9);
    assert_eq!(loops.practice_count, 1);

    let profile = engine.get_learner_profile("learner-1").await.unwrap();
    assert_eq!(profile.average_completion_time_seconds, 300.0);
    assert!(profile.last_activity_at.is_some());
    assert_eq!(engine.metrics().completions_processed, 1);
}

#[tokio::test]
async fn test_failed_attempt_leaves_skills_alone() {
    let engine = engine();
    let module = Module::new("loops-101", &["loops"]);
    let attempt = Performance { completed: false, score: 30.0, time_taken_seconds: 120.0 };

    let result = engine.process_completion("learner-1", &module, attempt).await.unwrap();
    assert!(result.completion.skills_updated.is_empty());
    assert_eq!(result.analysis.profile.total_completed, 0);
    assert!((result.analysis.profile.failure_rate - 1.0).abs() < 1e-9);

    let tree = engine.get_skill_tree("learner-1").await.unwrap();
    assert_eq!(tree.get("loops").unwrap().practice_count, 0);
}

#[tokio::test]
async fn test_completion_clamps_score_and_creates_new_skills() {
    let engine = engine();
    let module = Module::new("graphql-intro", &["graphql"]);
    let result = engine
        .process_completion("learner-1", &module, completed(150.0, -20.0))
        .await
        .unwrap();

    assert_eq!(result.completion.score, 100.0);
    assert_eq!(result.completion.time_taken_seconds, 0.0);

    let tree = engine.get_skill_tree("learner-1").await.unwrap();
    assert_eq!(tree.len(), 26);
    assert!((tree.proficiency("graphql").unwrap() - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_comprehensive_analysis_reports_struggling_skills() {
    let engine = engine();
    let module = Module::new("loops-101", &["loops"]);
    for _ in 0..3 {
        engine
            .process_completion("learner-1", &module, completed(10.0, 600.0))
            .await
            .unwrap();
    }

    let analysis = engine.comprehensive_analysis("learner-1").await.unwrap();
    assert_eq!(analysis.skills.total_skills, 25);
    assert_eq!(analysis.skills.levels.len(), 4);
    let novice = &analysis.skills.levels[0];
    assert_eq!(novice.count, 25);
    assert!((novice.percentage - 100.0).abs() < 1e-9);

    assert_eq!(analysis.improvement_areas.len(), 1);
    assert_eq!(analysis.improvement_areas[0].skill, "loops");
    assert_eq!(analysis.improvement_areas[0].practice_count, 3);

    assert!(analysis.recommended_next_skills.len() <= 5);
    assert!(analysis.top_recommendations.len() <= 3);
    assert_eq!(analysis.profile.total_attempted, 3);
}

#[tokio::test]
async fn test_select_next_honours_goal() {
    let engine = engine();
    let chosen = engine.select_next("learner-1", Some("arithmetic")).await.unwrap();
    assert_eq!(chosen.unwrap().id, "numbers");

    let any = engine.select_next("learner-1", Some("no-such-topic")).await.unwrap();
    assert!(any.is_some());

    let empty = Engine::new(MemoryStore::new(), StaticCatalog::default(), EngineConfig::default());
    assert!(empty.select_next("learner-1", None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_build_learning_path_orders_conditionals_before_loops() {
    let engine = engine();
    let path = engine
        .build_learning_path("learner-1", &["loops".to_string()], 10)
        .await
        .unwrap();

    let teaches = |skill: &str| {
        path.steps
            .iter()
            .position(|s| s.module.skills.iter().any(|k| k == skill))
    };
    let cond = teaches("conditionals").unwrap();
    let loops = teaches("loops").unwrap();
    assert!(cond < loops);
    assert_eq!(path.required_skills.last().map(String::as_str), Some("loops"));
    assert_eq!(engine.metrics().learning_paths_built, 1);
}

#[tokio::test]
async fn test_adaptive_recommendations_filters_and_falls_back() {
    let engine = engine();

    let short_only = RecommendationContext {
        max_duration_secs: Some(300.0),
        ..Default::default()
    };
    let result = engine.adaptive_recommendations("learner-1", short_only).await.unwrap();
    assert!(result.filters_applied);
    assert!(result.recommendations.iter().all(|r| r.module.duration_secs() <= 300.0));

    let impossible = RecommendationContext {
        goal: Some("underwater basket weaving".into()),
        difficulty: Some(Difficulty::Expert),
        max_duration_secs: Some(1.0),
    };
    let result = engine.adaptive_recommendations("learner-1", impossible).await.unwrap();
    assert!(!result.filters_applied);
    assert!(!result.recommendations.is_empty());

    // fresh learner: no pace hint, low mastery, no activity yet
    assert!(result.suggestions.len() <= 3);
    assert_eq!(result.suggestions.len(), 2);
    assert!(result.suggestions[0].contains("foundational"));
}

#[tokio::test]
async fn test_adaptive_suggestions_follow_priority() {
    let store = MemoryStore::new();
    let engine = Engine::new(store.clone(), StaticCatalog::new(catalog()), EngineConfig::default());

    let mut profile = engine.get_learner_profile("learner-1").await.unwrap();
    profile.learning_pace = Pace::Slow;
    profile.total_attempted = 4;
    profile.total_completed = 1;
    profile.last_activity_at = Some(Utc::now() - Duration::days(10));
    store.save_profile(&profile).await.unwrap();

    // bypass the engine cache so the edited profile is read back
    let engine = Engine::new(store, StaticCatalog::new(catalog()), EngineConfig::default());
    let result = engine
        .adaptive_recommendations("learner-1", RecommendationContext::default())
        .await
        .unwrap();

    assert_eq!(result.suggestions.len(), 3);
    assert!(result.suggestions[0].contains("Shorter modules"));
    assert!(result.suggestions[1].contains("foundational"));
    assert!(result.suggestions[2].contains("easier modules"));
}

#[tokio::test]
async fn test_reset_if_stale() {
    let engine = engine();

    let fresh = engine.reset_if_stale("learner-1").await.unwrap();
    assert_eq!(fresh.total_attempted, 0);
    assert_eq!(engine.metrics().stale_resets, 1);

    engine
        .process_completion("learner-1", &Module::new("m", &["loops"]), completed(70.0, 400.0))
        .await
        .unwrap();
    let active = engine.reset_if_stale("learner-1").await.unwrap();
    assert_eq!(active.total_attempted, 1);
    assert_eq!(engine.metrics().stale_resets, 1);
}

#[tokio::test]
async fn test_reset_if_stale_preserves_preferred_difficulty() {
    let store = MemoryStore::new();
    let mut profile = learnpath_lib::LearnerProfile::new("learner-1");
    profile.preferred_difficulty = Difficulty::Advanced;
    profile.total_attempted = 12;
    profile.total_completed = 9;
    profile.last_activity_at = Some(Utc::now() - Duration::days(45));
    store.save_profile(&profile).await.unwrap();

    let engine = Engine::new(store, StaticCatalog::new(catalog()), EngineConfig::default());
    let reset = engine.reset_if_stale("learner-1").await.unwrap();
    assert_eq!(reset.total_attempted, 0);
    assert_eq!(reset.total_completed, 0);
    assert_eq!(reset.preferred_difficulty, Difficulty::Advanced);
}

#[tokio::test]
async fn test_add_skill_persists_once() {
    let engine = engine();
    assert!(engine.add_skill("learner-1", "graphql", &["sql-queries".to_string()]).await.unwrap());
    assert!(!engine.add_skill("learner-1", "graphql", &[]).await.unwrap());

    let tree = engine.get_skill_tree("learner-1").await.unwrap();
    assert_eq!(tree.get("graphql").unwrap().prerequisites, vec!["sql-queries".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_completions_are_not_lost() {
    let engine = Arc::new(engine());
    let module = Module::new("loops-101", &["loops"]);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let engine = Arc::clone(&engine);
        let module = module.clone();
        handles.push(tokio::spawn(async move {
            engine
                .process_completion("learner-1", &module, completed(60.0, 300.0))
                .await
                .map(|_| ())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let profile = engine.get_learner_profile("learner-1").await.unwrap();
    assert_eq!(profile.total_attempted, 20);
    assert_eq!(profile.total_completed, 20);
    let tree = engine.get_skill_tree("learner-1").await.unwrap();
    assert_eq!(tree.get("loops").unwrap().practice_count, 20);
}

#[tokio::test]
async fn test_learners_are_isolated() {
    let engine = engine();
    engine
        .process_completion("alice", &Module::new("m", &["loops"]), completed(90.0, 300.0))
        .await
        .unwrap();

    let bob = engine.get_skill_tree("bob").await.unwrap();
    assert_eq!(bob.get("loops").unwrap().practice_count, 0);
    let bob_profile = engine.get_learner_profile("bob").await.unwrap();
    assert_eq!(bob_profile.total_attempted, 0);
}

#[tokio::test]
async fn test_learner_locks_stay_bounded_across_many_learners() {
    let engine = engine();
    for i in 0..1000 {
        engine.get_learner_profile(&format!("learner-{}", i)).await.unwrap();
    }

    assert!(engine.locks().len() <= DEFAULT_PRUNE_THRESHOLD);
    assert_eq!(engine.store().profile_count(), 1000);
}
