//! Integration tests for per-thread diagnostics on a shared context

use std::path::Path;
use std::sync::Barrier;
use std::thread;
use yang_context::{Context, ContextOptions, Diagnostic, ErrorKind, ErrorStore};

#[test]
fn test_threads_see_only_their_own_diagnostics() {
    let ctx = Context::new(None, ContextOptions::empty()).unwrap();
    let barrier = Barrier::new(4);

    thread::scope(|scope| {
        for worker in 0..4 {
            let ctx = &ctx;
            let barrier = &barrier;
            scope.spawn(move || {
                for n in 0..10 {
                    ctx.record_error(Diagnostic::new(
                        ErrorKind::InvalidArgument,
                        format!("worker {} error {}", worker, n),
                    ));
                }
                // everyone has written before anyone reads
                barrier.wait();

                let errors = ctx.errors();
                assert_eq!(errors.len(), 10);
                let prefix = format!("worker {} ", worker);
                assert!(errors.iter().all(|d| d.message.starts_with(&prefix)));
                assert_eq!(
                    ctx.last_error().unwrap().message,
                    format!("worker {} error 9", worker)
                );
            });
        }
    });

    // the main thread recorded nothing
    assert!(ctx.last_error().is_none());
}

#[test]
fn test_clean_errors_only_affects_calling_thread() {
    let ctx = Context::new(None, ContextOptions::empty()).unwrap();
    ctx.record_error(Diagnostic::new(ErrorKind::OutOfMemory, "main"));

    thread::scope(|scope| {
        scope.spawn(|| {
            ctx.record_error(Diagnostic::new(ErrorKind::SystemAccess, "worker"));
            ctx.clean_errors();
            assert!(ctx.errors().is_empty());
        });
    });

    assert_eq!(ctx.last_error().unwrap().message, "main");
}

#[test]
fn test_failed_operation_records_diagnostic() {
    let mut ctx = Context::new(None, ContextOptions::empty()).unwrap();
    let path = Path::new("/nonexistent/yang/models");

    let err = ctx.set_search_dir(Some(path)).unwrap_err();

    let diagnostic = ctx.last_error().unwrap();
    assert_eq!(diagnostic.kind, err.kind());
    assert_eq!(diagnostic.message, err.to_string());
    assert_eq!(diagnostic.path.as_deref(), Some(path));
}

#[test]
fn test_store_last_keeps_newest() {
    let mut ctx = Context::new(None, ContextOptions::empty()).unwrap();
    ctx.set_error_store(ErrorStore::Last);

    ctx.record_error(Diagnostic::new(ErrorKind::InvalidArgument, "older"));
    ctx.record_error(Diagnostic::new(ErrorKind::SystemAccess, "newer"));

    let errors = ctx.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "newer");
    assert!(ctx.last_error().is_none());
}

#[test]
fn test_error_store_off() {
    let mut ctx = Context::new(None, ContextOptions::empty()).unwrap();
    ctx.set_error_store(ErrorStore::Off);

    let _ = ctx.set_search_dir(Some(Path::new("/nonexistent/yang/models")));
    assert!(ctx.last_error().is_none());
    assert_eq!(ctx.error_store(), ErrorStore::Off);
}
