//! End-to-end planning scenarios.

use std::sync::Arc;

use planestra::{
    Binding, Constraint, Container, DependencyProvider, Metadata, PlanningContext, PlanningError,
    StaticDependencyProvider, Target, TargetKind, TypeKey, plan,
};

struct ImplA;
struct ConsoleLogger;
struct FileLogger;
struct NullLogger;
struct FooImpl;
struct BarImpl;
struct Samurai;
struct Katana;
struct Shuriken;
struct Armor;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn plan_single(
    provider: &dyn DependencyProvider,
    container: &Arc<Container>,
    identifier: &'static str,
) -> planestra::Result<PlanningContext> {
    init_tracing();
    plan(
        provider,
        container.clone(),
        false,
        TargetKind::Variable,
        identifier.into(),
        None,
        false,
    )
}

fn plan_array(
    provider: &dyn DependencyProvider,
    container: &Arc<Container>,
    identifier: &'static str,
) -> planestra::Result<PlanningContext> {
    init_tracing();
    plan(
        provider,
        container.clone(),
        true,
        TargetKind::Variable,
        identifier.into(),
        None,
        false,
    )
}

#[test]
fn sole_unconstrained_binding_plans_successfully() {
    let container = Container::new();
    container.bind(Binding::to_instance::<ImplA>("A".into()));
    let provider = StaticDependencyProvider::new();

    let ctx = plan_single(&provider, &container, "A").unwrap();
    let root = ctx.root_request().unwrap();
    assert_eq!(root.bindings().len(), 1);
    assert!(root.children().is_empty());
    assert!(root.parent().is_none());
}

#[test]
fn unregistered_identifier_is_not_registered() {
    let container = Container::new();
    let provider = StaticDependencyProvider::new();

    let err = plan_single(&provider, &container, "Missing").unwrap_err();
    assert!(matches!(err, PlanningError::NotRegistered { .. }));
    assert!(err.to_string().contains("No matching bindings found"));
    assert!(err.to_string().contains("Missing"));
}

#[test]
fn two_surviving_candidates_are_ambiguous_for_single_targets() {
    let container = Container::new();
    container.bind(Binding::to_instance::<Katana>("Weapon".into()));
    container.bind(Binding::to_instance::<Shuriken>("Weapon".into()));
    let provider = StaticDependencyProvider::new();

    let err = plan_single(&provider, &container, "Weapon").unwrap_err();
    assert!(matches!(err, PlanningError::AmbiguousMatch { .. }));
    let message = err.to_string();
    assert!(message.contains("Ambiguous match found"));
    // the dump lists every known registration
    assert!(message.contains("Katana"));
    assert!(message.contains("Shuriken"));
}

#[test]
fn bypassing_constraints_does_not_bypass_cardinality() {
    let container = Container::new();
    container.bind(Binding::to_instance::<Katana>("Weapon".into()));
    container.bind(Binding::to_instance::<Shuriken>("Weapon".into()));
    let provider = StaticDependencyProvider::new();

    let err = plan(
        &provider,
        container.clone(),
        false,
        TargetKind::Variable,
        "Weapon".into(),
        None,
        true,
    )
    .unwrap_err();
    assert!(matches!(err, PlanningError::AmbiguousMatch { .. }));
}

#[test]
fn array_targets_get_one_child_per_binding_in_registration_order() {
    let container = Container::new();
    let first = container.bind(Binding::to_instance::<ConsoleLogger>("Logger".into()));
    let second = container.bind(Binding::to_instance::<FileLogger>("Logger".into()));
    let third = container.bind(Binding::to_instance::<NullLogger>("Logger".into()));
    let provider = StaticDependencyProvider::new();

    let ctx = plan_array(&provider, &container, "Logger").unwrap();
    let root = ctx.root_request().unwrap();
    assert_eq!(root.bindings().len(), 3);

    let children = root.children();
    assert_eq!(children.len(), 3);
    let expected = [first.id(), second.id(), third.id()];
    for (child, expected_id) in children.iter().zip(expected) {
        assert_eq!(child.bindings().len(), 1);
        assert_eq!(child.bindings()[0].id(), expected_id);
    }
}

#[test]
fn constrained_loggers_all_survive_when_constraints_are_bypassed() {
    let container = Container::new();
    for tag in ["console", "file", "null"] {
        container.bind(
            Binding::to_instance::<ConsoleLogger>("Logger".into()).when(
                Constraint::TargetTagged {
                    key: "kind".into(),
                    value: tag.into(),
                },
            ),
        );
    }
    let provider = StaticDependencyProvider::new();

    // multi-injection resolves everything, so constraints are bypassed the
    // way a get-all entry point would
    let ctx = plan(
        &provider,
        container.clone(),
        true,
        TargetKind::Variable,
        "Logger".into(),
        None,
        true,
    )
    .unwrap();
    assert_eq!(ctx.root_request().unwrap().children().len(), 3);
}

#[test]
fn array_target_with_zero_candidates_is_not_registered() {
    let container = Container::new();
    let provider = StaticDependencyProvider::new();

    let err = plan_array(&provider, &container, "Logger").unwrap_err();
    assert!(matches!(err, PlanningError::NotRegistered { .. }));
}

#[test]
fn constraints_are_skipped_for_a_sole_candidate() {
    let container = Container::new();
    container.bind(
        Binding::to_instance::<ImplA>("A".into()).when(Constraint::custom(|_| Ok(false))),
    );
    let provider = StaticDependencyProvider::new();

    let ctx = plan_single(&provider, &container, "A").unwrap();
    assert_eq!(ctx.root_request().unwrap().bindings().len(), 1);
}

#[test]
fn self_referential_closure_is_a_circular_dependency() {
    let container = Container::new();
    container.bind(Binding::to_instance::<FooImpl>("Foo".into()));
    container.bind(Binding::to_instance::<BarImpl>("Bar".into()));

    let provider = StaticDependencyProvider::new();
    provider.register::<FooImpl>(vec![Target::new(
        TargetKind::ConstructorArgument,
        "Bar".into(),
        None,
    )]);
    provider.register::<BarImpl>(vec![Target::new(
        TargetKind::ConstructorArgument,
        "Foo".into(),
        None,
    )]);

    let err = plan_single(&provider, &container, "Foo").unwrap_err();
    assert!(matches!(err, PlanningError::CircularDependency { .. }));
    // the chain is reconstructed from the plan root
    assert!(err.to_string().contains("Foo --> Bar --> Foo"));
}

#[test]
fn repeated_identifier_with_distinct_targets_is_not_a_cycle() {
    let container = Container::new();
    container.bind(
        Binding::to_instance::<Katana>("Weapon".into()).when(Constraint::TargetTagged {
            key: "grade".into(),
            value: "forged".into(),
        }),
    );
    let template = container.bind(
        Binding::to_constant_value("Weapon".into(), Arc::new(0_u32)).when(
            Constraint::TargetTagged {
                key: "grade".into(),
                value: "template".into(),
            },
        ),
    );

    // the forged Katana is built from a template Weapon: the identifier
    // repeats on the path, but under a different tag that selects a
    // non-recursing binding
    let provider = StaticDependencyProvider::new();
    provider.register::<Katana>(vec![
        Target::new(TargetKind::ConstructorArgument, "Weapon".into(), None)
            .tagged("grade", "template"),
    ]);

    let ctx = plan(
        &provider,
        container.clone(),
        false,
        TargetKind::Variable,
        "Weapon".into(),
        Some(Metadata::new("grade", "forged")),
        false,
    )
    .unwrap();
    let root = ctx.root_request().unwrap();
    let children = root.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].bindings()[0].id(), template.id());
    assert!(children[0].children().is_empty());
}

#[test]
fn direct_self_dependency_is_a_circular_dependency() {
    let container = Container::new();
    container.bind(Binding::to_instance::<FooImpl>("Foo".into()));
    let provider = StaticDependencyProvider::new();
    provider.register::<FooImpl>(vec![Target::new(
        TargetKind::ConstructorArgument,
        "Foo".into(),
        None,
    )]);

    let err = plan_single(&provider, &container, "Foo").unwrap_err();
    assert!(matches!(err, PlanningError::CircularDependency { .. }));
    assert!(err.to_string().contains("Foo --> Foo"));
}

#[test]
fn child_shadowing_is_all_or_nothing() {
    let parent = Container::new();
    parent.bind(Binding::to_instance::<Katana>("Weapon".into()));
    let child = parent.create_child();
    // two candidates so constraint filtering engages, both filtered out
    child.bind(
        Binding::to_instance::<Katana>("Weapon".into()).when(Constraint::custom(|_| Ok(false))),
    );
    child.bind(
        Binding::to_instance::<Shuriken>("Weapon".into()).when(Constraint::custom(|_| Ok(false))),
    );
    let provider = StaticDependencyProvider::new();

    // the parent's usable binding must never be consulted
    let err = plan_single(&provider, &child, "Weapon").unwrap_err();
    assert!(matches!(err, PlanningError::NotRegistered { .. }));
}

#[test]
fn child_without_bindings_falls_back_to_the_parent() {
    let parent = Container::new();
    parent.bind(Binding::to_instance::<Katana>("Weapon".into()));
    let child = parent.create_child();
    let provider = StaticDependencyProvider::new();

    let ctx = plan_single(&provider, &child, "Weapon").unwrap();
    assert_eq!(ctx.root_request().unwrap().bindings().len(), 1);
}

#[test]
fn transitive_dependencies_expand_in_declaration_order() {
    let container = Container::new();
    container.bind(Binding::to_instance::<Samurai>("Warrior".into()));
    container.bind(Binding::to_instance::<Katana>("Weapon".into()));
    container.bind(Binding::to_instance::<Armor>("Armor".into()));

    let provider = StaticDependencyProvider::new();
    provider.register::<Samurai>(vec![
        Target::new(TargetKind::ConstructorArgument, "Weapon".into(), None),
        Target::new(TargetKind::ConstructorArgument, "Armor".into(), None),
    ]);

    let ctx = plan_single(&provider, &container, "Warrior").unwrap();
    let root = ctx.root_request().unwrap();
    let children = root.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].service_identifier(), &"Weapon".into());
    assert_eq!(children[1].service_identifier(), &"Armor".into());
    assert!(children[0].parent().is_some());
}

#[test]
fn tagged_root_targets_disambiguate_candidates() {
    let container = Container::new();
    container.bind(
        Binding::to_instance::<ConsoleLogger>("Logger".into()).when(Constraint::TargetTagged {
            key: "kind".into(),
            value: "console".into(),
        }),
    );
    let file = container.bind(
        Binding::to_instance::<FileLogger>("Logger".into()).when(Constraint::TargetTagged {
            key: "kind".into(),
            value: "file".into(),
        }),
    );
    let provider = StaticDependencyProvider::new();

    let ctx = plan(
        &provider,
        container.clone(),
        false,
        TargetKind::Variable,
        "Logger".into(),
        Some(Metadata::new("kind", "file")),
        false,
    )
    .unwrap();
    let root = ctx.root_request().unwrap();
    assert_eq!(root.bindings().len(), 1);
    assert_eq!(root.bindings()[0].id(), file.id());
}

#[test]
fn named_dependency_targets_disambiguate_candidates() {
    let container = Container::new();
    container.bind(Binding::to_instance::<Samurai>("Warrior".into()));
    let sharp = container.bind(
        Binding::to_instance::<Katana>("Weapon".into())
            .when(Constraint::TargetNamed("sharp".into())),
    );
    container.bind(
        Binding::to_instance::<Shuriken>("Weapon".into())
            .when(Constraint::TargetNamed("thrown".into())),
    );

    let provider = StaticDependencyProvider::new();
    provider.register::<Samurai>(vec![Target::new(
        TargetKind::ConstructorArgument,
        "Weapon".into(),
        Some("sharp"),
    )]);

    let ctx = plan_single(&provider, &container, "Warrior").unwrap();
    let root = ctx.root_request().unwrap();
    let children = root.children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].bindings()[0].id(), sharp.id());
}

#[test]
fn ancestry_constraints_see_the_real_parent_chain() {
    let container = Container::new();
    container.bind(Binding::to_instance::<Samurai>("Warrior".into()));
    let for_warriors = container.bind(
        Binding::to_instance::<Katana>("Weapon".into())
            .when(Constraint::InjectedInto("Warrior".into())),
    );
    container.bind(
        Binding::to_instance::<Shuriken>("Weapon".into())
            .when(Constraint::InjectedInto("Ninja".into())),
    );

    let provider = StaticDependencyProvider::new();
    provider.register::<Samurai>(vec![Target::new(
        TargetKind::ConstructorArgument,
        "Weapon".into(),
        None,
    )]);

    let ctx = plan_single(&provider, &container, "Warrior").unwrap();
    let children = ctx.root_request().unwrap().children();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].bindings()[0].id(), for_warriors.id());
}

#[test]
fn array_elements_expand_their_own_dependencies() {
    let container = Container::new();
    container.bind(Binding::to_instance::<Samurai>("Warrior".into()));
    container.bind(Binding::to_instance::<FooImpl>("Warrior".into()));
    container.bind(Binding::to_instance::<Katana>("Weapon".into()));

    let provider = StaticDependencyProvider::new();
    provider.register::<Samurai>(vec![Target::new(
        TargetKind::ConstructorArgument,
        "Weapon".into(),
        None,
    )]);

    let ctx = plan_array(&provider, &container, "Warrior").unwrap();
    let root = ctx.root_request().unwrap();
    let elements = root.children();
    assert_eq!(elements.len(), 2);
    // the Samurai element owns the Weapon subtree; the FooImpl one is a leaf
    assert_eq!(elements[0].children().len(), 1);
    assert_eq!(
        elements[0].children()[0].service_identifier(),
        &"Weapon".into()
    );
    assert!(elements[1].children().is_empty());
}

#[test]
fn non_instance_kinds_are_leaves() {
    let container = Container::new();
    container.bind(Binding::to_constant_value("Config".into(), Arc::new(42_u32)));
    let provider = StaticDependencyProvider::new();

    let ctx = plan_single(&provider, &container, "Config").unwrap();
    let root = ctx.root_request().unwrap();
    assert_eq!(root.bindings().len(), 1);
    assert!(root.children().is_empty());
}

struct FailingProvider;

impl DependencyProvider for FailingProvider {
    fn dependencies_of(&self, _implementation: &TypeKey) -> anyhow::Result<Vec<Target>> {
        anyhow::bail!("reflection metadata unavailable")
    }
}

#[test]
fn provider_failures_keep_their_original_message() {
    let container = Container::new();
    container.bind(Binding::to_instance::<ImplA>("A".into()));

    let err = plan_single(&FailingProvider, &container, "A").unwrap_err();
    assert!(matches!(err, PlanningError::External(_)));
    assert_eq!(err.to_string(), "reflection metadata unavailable");
}

#[test]
fn failing_constraints_abort_the_whole_plan() {
    let container = Container::new();
    container.bind(
        Binding::to_instance::<Katana>("Weapon".into())
            .when(Constraint::custom(|_| anyhow::bail!("tag lookup failed"))),
    );
    container.bind(Binding::to_instance::<Shuriken>("Weapon".into()));
    let provider = StaticDependencyProvider::new();

    let err = plan_single(&provider, &container, "Weapon").unwrap_err();
    assert!(matches!(err, PlanningError::External(_)));
    assert_eq!(err.to_string(), "tag lookup failed");
}

#[test]
fn not_registered_messages_dump_known_registrations() {
    let container = Container::new();
    container.bind(
        Binding::to_instance::<Katana>("Weapon".into()).when(Constraint::custom(|_| Ok(false))),
    );
    container.bind(
        Binding::to_instance::<Shuriken>("Weapon".into()).when(Constraint::custom(|_| Ok(false))),
    );
    let provider = StaticDependencyProvider::new();

    let err = plan_single(&provider, &container, "Weapon").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("No matching bindings found"));
    assert!(message.contains("Registered bindings:"));
    assert!(message.contains("Katana"));
    assert!(message.contains("Shuriken"));
}
