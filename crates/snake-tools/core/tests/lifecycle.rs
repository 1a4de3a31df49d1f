//! ToolInstance lifecycle through the public API only.

use snake_tools_core::{BoxFuture, Tool, ToolContext, ToolError, ToolInstance};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq)]
struct Flags {
    strict: bool,
    extra: Vec<String>,
}

/// Records what `handle` saw.
#[derive(Clone, Default)]
struct RecordingTool {
    seen: Arc<Mutex<Vec<(Option<String>, String, Flags)>>>,
}

impl Tool for RecordingTool {
    type Options = Flags;
    type Output = usize;
    const NAME: &'static str = "recording";
    const DESCRIPTION: &'static str = "Records every call";

    fn handle<'a>(
        &'a self,
        ctx: &'a ToolContext,
        path: &'a Path,
        options: Flags,
    ) -> BoxFuture<'a, Result<usize, ToolError>> {
        Box::pin(async move {
            let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
            seen.push((
                ctx.request_id().map(str::to_string),
                path.display().to_string(),
                options,
            ));
            Ok(seen.len())
        })
    }
}

fn flags() -> Flags {
    Flags {
        strict: true,
        extra: vec!["--show-error-codes".into()],
    }
}

#[tokio::test]
async fn options_are_forwarded_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let tool = RecordingTool::default();
    let seen = Arc::clone(&tool.seen);
    let mut instance = ToolInstance::bound(
        tool,
        ToolContext::new().with_request_id("7"),
        dir.path().to_string_lossy(),
    );

    let env = instance.run(None, None, flags()).await;
    assert_eq!(env.into_result(), Ok(1));

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0.as_deref(), Some("7"));
    assert_eq!(seen[0].1, dir.path().display().to_string());
    assert_eq!(seen[0].2, flags());
}

#[tokio::test]
async fn omitted_overrides_keep_stored_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut instance = ToolInstance::bound(
        RecordingTool::default(),
        ToolContext::new().with_request_id("a"),
        dir.path().to_string_lossy(),
    );

    instance
        .run(Some(ToolContext::new().with_request_id("b")), None, flags())
        .await;
    assert_eq!(instance.ctx().unwrap().request_id(), Some("b"));
    assert_eq!(
        instance.path_str(),
        Some(dir.path().to_string_lossy().as_ref())
    );
    assert!(instance.path_state().is_validated());
}

#[tokio::test]
async fn failure_envelope_serializes_with_null_data() {
    let mut instance = ToolInstance::new(RecordingTool::default());
    let env = instance
        .run(Some(ToolContext::new()), Some("/definitely/not/here".into()), flags())
        .await;

    let json = serde_json::to_value(&env).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["data"], serde_json::Value::Null);
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to run RecordingTool: Path '/definitely/not/here' does not exist\n"));
    assert!(instance.tool().seen.lock().unwrap().is_empty());
}
