//! Routed dispatch: sequences, resolution, redirection, error propagation.
//! Run with: cargo test --features test-utils --test dispatch

#![cfg(feature = "test-utils")]

use std::sync::Arc;
use switchyard::test_utils::{
    CallLog, Failing, Fixed, PassThrough, Recording, RepeatCall, RepeatContract, RepeatFacade,
    RepeatReply, Repeater,
};
use switchyard::{
    CallContext, EntryFacade, InstanceId, InstanceRouting, RouteError, RoutingOptions, from_fn,
};

const THROW_MESSAGE: &str = "repeatForward throw";

/// `continue`, `result` and `throw`, each wrapped so the log shows which ran.
fn base_routing(log: &CallLog) -> InstanceRouting<RepeatContract> {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing
        .add_default_component("continue", Arc::new(Recording::new("continue", log, PassThrough)))
        .unwrap();
    routing
        .add_default_component("result", Arc::new(Recording::new("result", log, Repeater)))
        .unwrap();
    routing
        .add_default_component(
            "throw",
            Arc::new(Recording::new("throw", log, Failing::new(THROW_MESSAGE))),
        )
        .unwrap();
    routing
}

fn facade(routing: InstanceRouting<RepeatContract>) -> RepeatFacade {
    RepeatFacade::new(Arc::new(routing)).unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sequences
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn sequence_stops_at_first_resolution() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing
        .add_default_sequence("driver", ["continue", "result", "throw"])
        .unwrap();
    routing.set_default_start("driver").unwrap();

    let facade = facade(routing);
    assert_eq!(facade.repeat_forward("foo", 3).unwrap(), "foofoofoo");
    assert_eq!(log.labels(), vec!["continue", "result"]);
}

#[test]
fn handler_error_aborts_the_chain_verbatim() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing.add_default_sequence("driver", ["throw", "result"]).unwrap();
    routing.set_default_start("driver").unwrap();

    let err = facade(routing).repeat_forward("foo", 3).unwrap_err();
    assert!(matches!(err, RouteError::Component(_)));
    assert_eq!(err.to_string(), THROW_MESSAGE);
    assert_eq!(log.labels(), vec!["throw"]);
}

#[test]
fn unresolved_chain_fails() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing.set_default_start("continue").unwrap();

    let err = facade(routing).repeat_forward("foo", 3).unwrap_err();
    assert!(matches!(err, RouteError::UnresolvedChain));
    assert_eq!(err.to_string(), "No resolved result!");
    assert_eq!(log.labels(), vec!["continue"]);
}

#[test]
fn sequence_checks_every_subkey_before_running() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing
        .add_default_sequence("driver", ["continue", "never-registered", "result"])
        .unwrap();
    routing.set_default_start("driver").unwrap();

    let err = facade(routing).repeat_forward("foo", 3).unwrap_err();
    assert!(matches!(&err, RouteError::UnknownKey(k) if k.as_str() == "never-registered"));
    assert!(log.labels().is_empty());
}

#[test]
fn exhausted_inner_sequence_defers_to_outer() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing.add_default_sequence("inner", ["continue"]).unwrap();
    routing.add_default_sequence("outer", ["inner", "result"]).unwrap();
    routing.set_default_start("outer").unwrap();

    assert_eq!(facade(routing).repeat_forward("ab", 2).unwrap(), "abab");
    assert_eq!(log.labels(), vec!["continue", "result"]);
}

#[test]
fn sequence_rejects_repeated_subkeys() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    let err = routing
        .add_default_sequence("driver", ["a", "b", "a"])
        .unwrap_err();
    assert!(matches!(err, RouteError::DuplicateKey(k) if k.as_str() == "a"));
    assert!(routing.default_registry().is_empty());
}

#[test]
fn sequence_subkeys_may_be_registered_later() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing.add_default_sequence("driver", ["result"]).unwrap();
    routing.add_default_component("result", Arc::new(Repeater)).unwrap();
    routing.set_default_start("driver").unwrap();
    assert_eq!(facade(routing).repeat_forward("z", 2).unwrap(), "zz");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Context behaviour
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn rewritten_arguments_reach_later_handlers() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing
        .add_default_component(
            "double",
            from_fn::<RepeatContract, _>(|ctx, call| {
                if let RepeatCall::RepeatForward { value, times } = call {
                    ctx.set_modified_arguments(RepeatCall::RepeatForward {
                        value,
                        times: times * 2,
                    });
                }
                Ok(())
            }),
        )
        .unwrap();
    routing.add_default_sequence("driver", ["double", "result"]).unwrap();
    routing.set_default_start("driver").unwrap();

    let facade = facade(routing);
    assert_eq!(facade.repeat_forward("ab", 2).unwrap(), "abababab");
    // Other operations pass through untouched.
    assert_eq!(facade.count_chars("héllo").unwrap(), 5);
}

#[test]
fn second_resolution_is_rejected_and_first_value_kept() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing
        .add_default_component(
            "greedy",
            from_fn::<RepeatContract, _>(|ctx, _call| {
                ctx.set_return_value(RepeatReply::Repeated("first".into()))?;
                let second = ctx.set_return_value(RepeatReply::Repeated("second".into()));
                assert!(matches!(
                    second,
                    Err(RouteError::AlreadyResolved {
                        operation: "repeatForward"
                    })
                ));
                assert_eq!(
                    ctx.return_value(),
                    Some(&RepeatReply::Repeated("first".into()))
                );
                Ok(())
            }),
        )
        .unwrap();
    routing.set_default_start("greedy").unwrap();
    assert_eq!(facade(routing).repeat_forward("x", 9).unwrap(), "first");
}

#[test]
fn resolving_twice_through_a_sequence_surfaces_the_error() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing
        .add_default_component(
            "resolve-then-forward",
            from_fn::<RepeatContract, _>(|ctx, _call| {
                ctx.set_return_value(RepeatReply::Repeated("early".into()))?;
                ctx.call_target("result")
            }),
        )
        .unwrap();
    routing.add_default_component("result", Arc::new(Repeater)).unwrap();
    routing.set_default_start("resolve-then-forward").unwrap();

    let err = facade(routing).repeat_forward("x", 1).unwrap_err();
    assert!(matches!(err, RouteError::AlreadyResolved { .. }));
}

#[test]
fn sequence_entered_after_resolution_runs_nothing() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing.add_default_sequence("late", ["continue", "result"]).unwrap();
    routing
        .add_default_component(
            "front",
            from_fn::<RepeatContract, _>(|ctx, _call| {
                ctx.set_return_value(RepeatReply::Count(1))?;
                ctx.call_target("late")
            }),
        )
        .unwrap();
    routing.set_default_start("front").unwrap();

    assert_eq!(facade(routing).count_chars("abc").unwrap(), 1);
    assert!(log.labels().is_empty());
}

#[test]
fn sequence_on_resolved_context_still_checks_subkeys() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing.add_default_sequence("late", ["ghost"]).unwrap();
    routing
        .add_default_component(
            "front",
            from_fn::<RepeatContract, _>(|ctx, _call| {
                ctx.set_return_value(RepeatReply::Count(1))?;
                ctx.call_target("late")
            }),
        )
        .unwrap();
    routing.set_default_start("front").unwrap();

    let err = facade(routing).count_chars("abc").unwrap_err();
    assert!(matches!(err, RouteError::UnknownKey(k) if k.as_str() == "ghost"));
}

#[test]
fn handler_can_redirect_to_another_key() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing
        .add_default_component(
            "router",
            from_fn::<RepeatContract, _>(|ctx, call| match call {
                RepeatCall::RepeatForward { .. } => ctx.call_target("result"),
                RepeatCall::CountChars { .. } => ctx.call_target("throw"),
            }),
        )
        .unwrap();
    routing.set_default_start("router").unwrap();

    let facade = facade(routing);
    assert_eq!(facade.repeat_forward("q", 3).unwrap(), "qqq");
    let err = facade.count_chars("q").unwrap_err();
    assert_eq!(err.to_string(), THROW_MESSAGE);
    assert_eq!(log.labels(), vec!["result", "throw"]);
}

#[test]
fn diamond_delegation_reaches_shared_leaf_twice() {
    let log = CallLog::new();
    let mut routing = base_routing(&log);
    routing.add_default_sequence("left", ["continue"]).unwrap();
    routing.add_default_sequence("right", ["continue", "result"]).unwrap();
    routing.add_default_sequence("top", ["left", "right"]).unwrap();
    routing.set_default_start("top").unwrap();

    assert_eq!(facade(routing).repeat_forward("d", 1).unwrap(), "d");
    assert_eq!(log.labels(), vec!["continue", "continue", "result"]);
}

#[test]
fn cyclic_routing_trips_the_depth_guard() {
    let mut routing = InstanceRouting::<RepeatContract>::new()
        .with_options(RoutingOptions { max_depth: 16 })
        .unwrap();
    routing
        .add_default_component(
            "loop",
            from_fn::<RepeatContract, _>(|ctx, _call| ctx.call_target("loop")),
        )
        .unwrap();
    routing.set_default_start("loop").unwrap();

    let err = facade(routing).repeat_forward("x", 1).unwrap_err();
    assert!(matches!(err, RouteError::DepthExceeded { depth: 16, .. }));
}

#[test]
fn self_referencing_sequence_trips_the_depth_guard() {
    let mut routing = InstanceRouting::<RepeatContract>::new()
        .with_options(RoutingOptions { max_depth: 8 })
        .unwrap();
    routing.add_default_sequence("again", ["again"]).unwrap();
    routing.set_default_start("again").unwrap();

    let err = facade(routing).repeat_forward("x", 1).unwrap_err();
    assert!(matches!(err, RouteError::DepthExceeded { .. }));
}

#[test]
fn zero_depth_limit_is_rejected() {
    let err = InstanceRouting::<RepeatContract>::new()
        .with_options(RoutingOptions { max_depth: 0 })
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidOptions(_)));
}

#[test]
fn depth_limit_of_one_allows_a_single_hop() {
    let mut routing = InstanceRouting::<RepeatContract>::new()
        .with_options(RoutingOptions { max_depth: 1 })
        .unwrap();
    routing.add_default_component("result", Arc::new(Repeater)).unwrap();
    routing.set_default_start("result").unwrap();
    assert_eq!(facade(routing).repeat_forward("a", 2).unwrap(), "aa");
}

#[test]
fn handler_can_call_back_into_the_entry_point() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing
        .add_default_component(
            "front",
            from_fn::<RepeatContract, _>(|ctx, call| match call {
                // Resolve countChars by asking the entry point to repeat first.
                RepeatCall::CountChars { value } => {
                    let reply = ctx.call_entry(RepeatCall::RepeatForward { value, times: 2 })?;
                    match reply {
                        RepeatReply::Repeated(s) => {
                            ctx.set_return_value(RepeatReply::Count(s.chars().count()))
                        }
                        RepeatReply::Count(_) => Err(RouteError::UnexpectedReply {
                            operation: "repeatForward",
                        }),
                    }
                }
                RepeatCall::RepeatForward { .. } => ctx.call_target("result"),
            }),
        )
        .unwrap();
    routing.add_default_component("result", Arc::new(Repeater)).unwrap();
    routing.set_default_start("front").unwrap();

    assert_eq!(facade(routing).count_chars("abc").unwrap(), 6);
}

#[test]
fn built_context_reports_the_operation_its_arguments_carry() {
    let log = CallLog::new();
    let routing = base_routing(&log);
    let instance = InstanceId::new();

    let mut ctx = routing.build_context(
        &instance,
        RepeatCall::RepeatForward {
            value: "a".into(),
            times: 2,
        },
    );
    assert_eq!(ctx.operation_name(), "repeatForward");
    assert_eq!(ctx.entry_point(), &instance);
    assert_eq!(ctx.depth(), 0);
    assert!(!ctx.is_resolved());

    ctx.call_target("continue").unwrap();
    assert!(!ctx.is_resolved());
    ctx.call_target("result").unwrap();
    assert_eq!(ctx.return_value(), Some(&RepeatReply::Repeated("aa".into())));
    assert_eq!(ctx.depth(), 0);
    assert_eq!(log.labels(), vec!["continue", "result"]);
}

#[test]
fn rewriting_to_another_operation_changes_the_reported_name() {
    let routing = base_routing(&CallLog::new());
    let mut ctx = routing.build_context(
        &InstanceId::new(),
        RepeatCall::CountChars { value: "abc".into() },
    );
    assert_eq!(ctx.operation_name(), "countChars");
    ctx.set_modified_arguments(RepeatCall::RepeatForward {
        value: "abc".into(),
        times: 1,
    });
    assert_eq!(ctx.operation_name(), "repeatForward");
    ctx.call_target("result").unwrap();
    assert_eq!(ctx.return_value(), Some(&RepeatReply::Repeated("abc".into())));
}

#[test]
fn entry_point_is_visible_to_handlers() {
    let instance = InstanceId::new();
    let expected = instance.clone();
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing
        .add_default_component(
            "check",
            from_fn::<RepeatContract, _>(move |ctx: &mut CallContext<'_, RepeatContract>, _call| {
                assert_eq!(ctx.entry_point(), &expected);
                assert_eq!(ctx.operation_name(), "countChars");
                assert_eq!(ctx.depth(), 1);
                ctx.set_return_value(RepeatReply::Count(0))
            }),
        )
        .unwrap();
    routing.set_default_start("check").unwrap();

    let facade = RepeatFacade::with_instance(Arc::new(routing), instance).unwrap();
    assert_eq!(facade.count_chars("ignored").unwrap(), 0);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Façade
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn mismatched_reply_is_reported() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing
        .add_default_component("wrong", Arc::new(Fixed::<RepeatContract>::new(RepeatReply::Count(1))))
        .unwrap();
    routing.set_default_start("wrong").unwrap();

    let err = facade(routing).repeat_forward("x", 1).unwrap_err();
    assert!(matches!(
        err,
        RouteError::UnexpectedReply {
            operation: "repeatForward"
        }
    ));
}

#[test]
fn raw_entry_facade_returns_contract_reply() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing.add_default_component("result", Arc::new(Repeater)).unwrap();
    routing.set_default_start("result").unwrap();

    let entry = EntryFacade::new(Arc::new(routing)).unwrap();
    let reply = entry
        .dispatch(RepeatCall::CountChars {
            value: "four".into(),
        })
        .unwrap();
    assert_eq!(reply, RepeatReply::Count(4));
}

#[test]
fn routing_is_shareable_across_threads() {
    let mut routing = InstanceRouting::<RepeatContract>::new();
    routing.add_default_component("result", Arc::new(Repeater)).unwrap();
    routing.set_default_start("result").unwrap();
    let routing = Arc::new(routing);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let routing = Arc::clone(&routing);
            std::thread::spawn(move || {
                let facade = RepeatFacade::new(routing).unwrap();
                facade.repeat_forward("t", i).unwrap()
            })
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec!["", "t", "tt", "ttt"]);
}
