//! Hook I/O envelope
//!
//! Decodes the stdin payload, runs one handler, and renders the verdict in
//! the shape the host expects. This layer fails open: empty or malformed
//! input, an undecidable handler, or a rendering fault all resolve to a
//! silent allow.

use serde::Serialize;

use super::{BlockStyle, HookEvent, HookHandler, HookInput, HookResult};

/// Legacy block signal
#[derive(Debug, Serialize)]
struct LegacyBlock<'a> {
    decision: &'static str,
    reason: &'a str,
}

/// Structured permission decision
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionOutput<'a> {
    hook_specific_output: PermissionDecision<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionDecision<'a> {
    hook_event_name: &'static str,
    permission_decision: &'static str,
    permission_decision_reason: &'a str,
}

/// Decode a raw stdin payload. `None` means "no opinion".
pub fn decode(raw: &str) -> Option<HookInput> {
    if raw.trim().is_empty() {
        log::debug!("Empty hook payload");
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(payload) => Some(HookInput::from_value(&payload)),
        Err(e) => {
            log::warn!("Ignoring malformed hook payload: {}", e);
            None
        }
    }
}

/// Event to evaluate under.
///
/// The payload's `hook_event_name` is used when the handler handles it.
/// Otherwise the hook runs under its own event, so a hook registered under
/// an unexpected event still applies its policy.
fn resolve_event(handler: &dyn HookHandler, input: &HookInput, default_event: HookEvent) -> HookEvent {
    match input.event_name.as_deref().and_then(HookEvent::parse) {
        Some(event) if handler.handles(event) => event,
        Some(event) => {
            if event != default_event && handler.handles(default_event) {
                log::warn!(
                    "{} received {} but handles {}; evaluating as {}",
                    handler.name(),
                    event.as_str(),
                    default_event.as_str(),
                    default_event.as_str()
                );
            }
            default_event
        }
        None => default_event,
    }
}

/// Run `handler` against an already-decoded input under `event`.
///
/// `Indeterminate` is reported on stderr and becomes `Allow`.
pub fn evaluate(handler: &dyn HookHandler, event: HookEvent, input: &HookInput) -> HookResult {
    if !handler.handles(event) {
        log::debug!("{} does not handle {}", handler.name(), event.as_str());
        return HookResult::Allow;
    }

    match handler.handle(event, input) {
        HookResult::Indeterminate { message } => {
            log::error!("{} could not decide: {}", handler.name(), message);
            eprintln!("[{} error: {}]", handler.name(), message);
            HookResult::Allow
        }
        result => result,
    }
}

/// Render a verdict for stdout. `None` means print nothing.
pub fn render(result: &HookResult, style: BlockStyle, event: HookEvent) -> Option<String> {
    match result {
        HookResult::Allow | HookResult::Indeterminate { .. } => None,
        HookResult::Inject { context } if context.is_empty() => None,
        HookResult::Inject { context } => Some(context.clone()),
        HookResult::Block { message } => {
            let json = match style {
                BlockStyle::Legacy => serde_json::to_string(&LegacyBlock {
                    decision: "block",
                    reason: message,
                }),
                BlockStyle::Permission => serde_json::to_string(&PermissionOutput {
                    hook_specific_output: PermissionDecision {
                        hook_event_name: event.as_str(),
                        permission_decision: "deny",
                        permission_decision_reason: message,
                    },
                }),
            };

            match json {
                Ok(json) => Some(json),
                Err(e) => {
                    log::error!("Failed to serialize block decision: {}", e);
                    None
                }
            }
        }
    }
}

/// Full pipeline from raw stdin text to the stdout text, if any
pub fn process(handler: &dyn HookHandler, default_event: HookEvent, raw: Option<&str>) -> Option<String> {
    let input = match raw {
        Some(raw) => decode(raw)?,
        None => HookInput::empty(),
    };

    let event = resolve_event(handler, &input, default_event);
    let result = evaluate(handler, event, &input);
    match &result {
        HookResult::Block { message } => {
            log::info!("{} blocked: {}", handler.name(), message.lines().next().unwrap_or(""));
        }
        HookResult::Inject { context } => log::debug!("{} injected {} bytes", handler.name(), context.len()),
        _ => log::debug!("{} allowed", handler.name()),
    }

    render(&result, handler.block_style(), event)
}
