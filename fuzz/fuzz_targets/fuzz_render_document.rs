#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use mdx_components::{Document, HtmlOptions, Registry, Renderer, Scope, to_html};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(document) = Document::parse(json, Path::new("fuzz.json")) else {
        return;
    };

    let registry = Registry::builtin();
    if let Ok(tree) = document.render(&Renderer::new(&registry), &Scope::empty()) {
        let _ = to_html(&tree, &HtmlOptions::default());
    }
});
