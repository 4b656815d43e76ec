//! AFL++ fuzz target for `mdtext`.
//!
//! This binary is intentionally stdin-driven, so it can be used with AFL++.
//! Build and run it via `cargo-afl`:
//!
//! ```bash
//! cargo install cargo-afl
//!
//! cargo afl build --release --features afl_fuzz --bin mdtext_afl_render
//!
//! mkdir -p fuzz/afl/out
//!
//! cargo afl fuzz \
//!   -i fuzz/afl/in \
//!   -o fuzz/afl/out \
//!   target/release/mdtext_afl_render
//! ```
//!
//! Rust panics normally unwind and exit with a non-crashing status code.
//! AFL++ only treats crashes as signals/aborts. We therefore catch any unwind
//! and turn it into `abort()`.

use std::collections::HashMap;
use std::io::Read;

use mdtext::{RenderOptions, Renderer, ast::*, resolve};

const MAX_INPUT_LEN: usize = 1_000_000; // 1MB guardrail; AFL++ will typically cap this anyway.

/// Positions must be dense and zero-based within each scope.
fn check_positions(table: &resolve::PositionTable) {
    let mut next: HashMap<usize, usize> = HashMap::new();
    for anchor in table.entries() {
        let expected = next.entry(anchor.scope).or_insert(0);
        assert_eq!(anchor.position, *expected, "gap in scope {}", anchor.scope);
        *expected += 1;
    }
}

fn run_one_input(data: &[u8]) {
    if data.len() > MAX_INPUT_LEN {
        // guardrail: avoid pathological OOM / quadratic behavior on enormous inputs.
        return;
    }

    // AFL++ will happily hand us arbitrary bytes; most of them are not JSON.
    let src = String::from_utf8_lossy(data).to_string();
    let Ok(root) = mdtext::load_tree(&src) else {
        return;
    };

    // JSON round-trip must never panic.
    let json = serde_json::to_vec(&root).unwrap();
    let back: Node = serde_json::from_slice(&json).unwrap();

    let resolved = resolve::resolve(back);
    check_positions(&resolved.headers);
    check_positions(&resolved.items);

    // rendering should never panic, with or without debug markers.
    let opts = RenderOptions::default();
    let _text = Renderer::new(&resolved, &opts).render();
    let debug = RenderOptions {
        debug: true,
        ..RenderOptions::default()
    };
    let _text = Renderer::new(&resolved, &debug).render();
}

fn main() {
    let mut data = Vec::new();
    std::io::stdin().read_to_end(&mut data).unwrap();

    // convert any panic into an abort().
    if std::panic::catch_unwind(|| run_one_input(&data)).is_err() {
        std::process::abort();
    }
}
