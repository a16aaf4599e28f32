//! End-to-end action tests.
//!
//! These tests assemble realistic chains out of plain middleware,
//! context-aware middleware and the built-in stages, and drive them the way
//! a caller would.

use proptest::prelude::*;
use sextant_core::{codes, ActionResult, BoxFuture};
use sextant_middleware::{
    apply_middleware, boxed, compose_middleware, create_context_middleware, ActionBuilder, And,
    Context, ContextMiddleware, ContextNext, Empty, FnMiddleware, Next,
};
use sextant_middleware::stages::{
    schema_fn, validate, with_logging, CatchPanicMiddleware, FnLogger, MaskErrorsMiddleware,
    ParseOutcome, TelemetryMiddleware,
};
use sextant_test::{assert_failure, assert_success, CallRecorder, MockHandler};

#[derive(Debug, Clone, PartialEq)]
struct Request {
    token: Option<String>,
    title: String,
}

impl Request {
    fn new(token: Option<&str>, title: &str) -> Self {
        Self {
            token: token.map(str::to_string),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: u32,
    admin: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Db {
    tenant: u32,
}

/// Resolves the bearer token into a `User`, or stops the chain.
struct Authenticate;

impl ContextMiddleware<Request, String> for Authenticate {
    type Requires = Empty;
    type Provides = User;

    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn process<'a>(
        &'a self,
        ctx: Context<Empty>,
        request: Request,
        next: ContextNext<And<User, Empty>, Request, String>,
    ) -> BoxFuture<'a, ActionResult<String>> {
        Box::pin(async move {
            let user = match request.token.as_deref() {
                Some("admin-token") => User { id: 1, admin: true },
                Some("user-token") => User { id: 2, admin: false },
                _ => return ActionResult::error_with_code("Unauthorized", codes::UNAUTHORIZED),
            };
            next.run(ctx.provide(user), request).await
        })
    }
}

/// Opens a tenant-scoped database handle for the authenticated user.
struct ConnectDb;

impl ContextMiddleware<Request, String> for ConnectDb {
    type Requires = And<User, Empty>;
    type Provides = Db;

    fn name(&self) -> &'static str {
        "connect_db"
    }

    fn process<'a>(
        &'a self,
        ctx: Context<And<User, Empty>>,
        request: Request,
        next: ContextNext<And<Db, And<User, Empty>>, Request, String>,
    ) -> BoxFuture<'a, ActionResult<String>> {
        Box::pin(async move {
            let db = Db {
                tenant: ctx.get::<User, _>().id * 100,
            };
            next.run(ctx.provide(db), request).await
        })
    }
}

fn non_empty_title() -> impl sextant_middleware::stages::Schema<Request> {
    schema_fn(|request: Request| {
        if request.title.trim().is_empty() {
            ParseOutcome::issue("title is required")
        } else {
            ParseOutcome::success(Request {
                title: request.title.trim().to_string(),
                ..request
            })
        }
    })
}

#[tokio::test]
async fn test_unauthenticated_call_never_reaches_handler() {
    let handler = MockHandler::<Request, String>::succeeding("created".to_string());

    let action = ActionBuilder::<Request, String>::new()
        .use_context(Authenticate)
        .use_context(ConnectDb)
        .handle(handler.handler());

    let message = assert_failure(
        action.call(Request::new(None, "hello")).await,
        Some(codes::UNAUTHORIZED),
    );
    assert_eq!(message, "Unauthorized");
    assert!(!handler.was_called());
}

#[tokio::test]
async fn test_authenticated_call_sees_accumulated_context() {
    let action = ActionBuilder::<Request, String>::new()
        .use_context(Authenticate)
        .use_context(ConnectDb)
        .handle(|ctx, request: Request| async move {
            let user = ctx.get::<User, _>();
            let db = ctx.get::<Db, _>();
            ActionResult::success(format!(
                "{}:{}:{}:{}",
                user.id, user.admin, db.tenant, request.title
            ))
        });

    let data = assert_success(action.call(Request::new(Some("user-token"), "post")).await);
    assert_eq!(data, "2:false:200:post");
}

#[tokio::test]
async fn test_full_server_chain() {
    let recorder = CallRecorder::new();
    let handler = MockHandler::<Request, String>::succeeding("ok".to_string()).with_recorder(&recorder);

    let action = ActionBuilder::<Request, String>::new()
        .use_middleware(CatchPanicMiddleware::new())
        .use_middleware(TelemetryMiddleware::new("create_post"))
        .use_middleware(
            MaskErrorsMiddleware::new()
                .expose_code(codes::UNAUTHORIZED)
                .expose_code(codes::VALIDATION_ERROR),
        )
        .use_middleware(recorder.middleware("outer"))
        .use_context(Authenticate)
        .use_middleware(validate(non_empty_title()))
        .use_context(ConnectDb)
        .handle(handler.handler());

    assert_eq!(
        action.link_names(),
        vec![
            "catch_panic",
            "telemetry",
            "mask_errors",
            "outer",
            "authenticate",
            "validation",
            "connect_db",
        ]
    );

    let ok = action.call(Request::new(Some("admin-token"), "  padded  ")).await;
    assert_eq!(assert_success(ok), "ok");
    assert_eq!(handler.calls()[0].title, "padded");

    let invalid = action.call(Request::new(Some("admin-token"), "   ")).await;
    assert_eq!(
        assert_failure(invalid, Some(codes::VALIDATION_ERROR)),
        "title is required"
    );

    let denied = action.call(Request::new(Some("bogus"), "x")).await;
    assert_failure(denied, Some(codes::UNAUTHORIZED));

    assert_eq!(handler.call_count(), 1);
    assert_eq!(
        recorder.events(),
        [
            "enter:outer",
            "handler",
            "exit:outer",
            "enter:outer",
            "exit:outer",
            "enter:outer",
            "exit:outer",
        ]
    );
}

#[tokio::test]
async fn test_masking_hides_unexposed_handler_failure() {
    let action = ActionBuilder::<Request, String>::new()
        .use_middleware(MaskErrorsMiddleware::new())
        .use_context(Authenticate)
        .handle(|_ctx, _request: Request| async {
            ActionResult::error_with_code("connection refused: 10.0.0.3", "DB_DOWN")
        });

    let message = assert_failure(
        action.call(Request::new(Some("user-token"), "x")).await,
        Some(codes::INTERNAL_ERROR),
    );
    assert_eq!(message, "An internal error occurred");
}

#[tokio::test]
async fn test_logging_sees_every_outcome() {
    let recorder = CallRecorder::new();
    let (called, failed) = (recorder.clone(), recorder.clone());
    let logger = FnLogger::new()
        .when_called(move |request: &Request| called.record(format!("call:{}", request.title)))
        .when_failed(move |_message: &str, code: Option<&str>, _request: &Request| {
            failed.record(format!("failed:{}", code.unwrap_or("-")));
        });

    let action = ActionBuilder::<Request, String>::new()
        .use_middleware(with_logging(logger))
        .use_context(Authenticate)
        .handle(|_ctx, request: Request| async move { ActionResult::success(request.title) });

    let _ = action.call(Request::new(None, "a")).await;
    let _ = action.call(Request::new(Some("user-token"), "b")).await;

    assert_eq!(recorder.events(), ["call:a", "failed:UNAUTHORIZED", "call:b"]);
}

#[tokio::test]
async fn test_fn_context_middleware_in_chain() {
    #[derive(Debug)]
    struct RequestId(u64);

    let with_request_id = create_context_middleware::<Empty, RequestId, u64, u64, _, _>(
        "request_id",
        |ctx: Context<Empty>, n: u64, next: ContextNext<And<RequestId, Empty>, u64, u64>| async move {
            next.run(ctx.provide(RequestId(n * 10)), n).await
        },
    );

    let action = ActionBuilder::new()
        .use_context(with_request_id)
        .handle(|ctx, n: u64| async move { ActionResult::success(ctx.get::<RequestId, _>().0 + n) });

    assert_eq!(action.call(4).await, ActionResult::success(44));
}

#[tokio::test]
async fn test_apply_and_compose_agree_with_builder() {
    let recorder = CallRecorder::new();
    let list = || vec![boxed(recorder.middleware("a")), boxed(recorder.middleware("b"))];

    let mock = MockHandler::<u8, u8>::succeeding(1).with_recorder(&recorder);

    let applied = apply_middleware(mock.action(), list());
    assert_success(applied.call(0).await);
    let applied_trace = recorder.events();
    recorder.clear();

    let composed = apply_middleware(mock.action(), [boxed(compose_middleware(list()))]);
    assert_success(composed.call(0).await);
    let composed_trace = recorder.events();
    recorder.clear();

    let built = ActionBuilder::new()
        .use_middleware(recorder.middleware("a"))
        .use_middleware(recorder.middleware("b"))
        .handle(mock.handler());
    assert_success(built.call(0).await);

    assert_eq!(applied_trace, composed_trace);
    assert_eq!(applied_trace, recorder.events());
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_argument_transform_reaches_handler() {
    let action = ActionBuilder::new()
        .use_middleware(FnMiddleware::new("double", |n: i64, next: Next<i64, i64>| async move {
            next.run(n * 2).await
        }))
        .use_middleware(FnMiddleware::new("negate", |n: i64, next: Next<i64, i64>| async move {
            next.run(-n).await
        }))
        .handle(|_ctx: Context, n: i64| async move { ActionResult::success(n) });

    assert_eq!(action.call(3).await, ActionResult::success(-6));
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_pass_through_chain_preserves_success(depth in 0usize..24, value in any::<i64>()) {
        let recorder = CallRecorder::new();
        let names: Vec<&'static str> = ["a", "b", "c", "d", "e", "f"].iter().copied().cycle().take(depth).collect();

        let action = apply_middleware(
            MockHandler::<i64, i64>::succeeding(value).action(),
            names.iter().map(|name| boxed(recorder.middleware(*name))),
        );

        let result = run(action.call(value));
        prop_assert_eq!(result, ActionResult::success(value));
        prop_assert_eq!(recorder.len(), depth * 2);

        let events = recorder.events();
        for (i, name) in names.iter().enumerate() {
            prop_assert_eq!(&events[i], &format!("enter:{name}"));
            prop_assert_eq!(&events[events.len() - 1 - i], &format!("exit:{name}"));
        }
    }

    #[test]
    fn prop_short_circuit_position_limits_trace(depth in 1usize..12, stop_at in 0usize..12) {
        let stop_at = stop_at % depth;
        let recorder = CallRecorder::new();
        let handler = MockHandler::<u8, u8>::succeeding(0);

        let mut builder = ActionBuilder::new();
        for i in 0..depth {
            if i == stop_at {
                builder = builder.use_middleware(FnMiddleware::new("stop", |_n: u8, _next: Next<u8, u8>| async {
                    ActionResult::error_with_code("stopped", "STOP")
                }));
            } else {
                builder = builder.use_middleware(recorder.middleware("pass"));
            }
        }
        let action = builder.handle(handler.handler());

        let result = run(action.call(0));
        prop_assert_eq!(result.code(), Some("STOP"));
        prop_assert!(!handler.was_called());
        prop_assert_eq!(recorder.len(), stop_at * 2);
    }

    #[test]
    fn prop_validation_accepts_exactly_valid_input(title in ".{0,12}") {
        let handler = MockHandler::<Request, String>::succeeding("ok".to_string());
        let action = ActionBuilder::new()
            .use_middleware(validate(non_empty_title()))
            .handle(handler.handler());

        let result = run(action.call(Request::new(None, &title)));
        if title.trim().is_empty() {
            prop_assert_eq!(result.code(), Some(codes::VALIDATION_ERROR));
            prop_assert!(!handler.was_called());
        } else {
            prop_assert!(result.is_success());
            prop_assert_eq!(handler.calls()[0].title.clone(), title.trim().to_string());
        }
    }
}
