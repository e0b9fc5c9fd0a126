use std::{path::Path, sync::Arc};

use anyhow::{Result, anyhow};
use swc_common::{FileName, Globals, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Pick the swc syntax for a source file from its extension.
pub fn syntax_for(path: &Path) -> Syntax {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts" | "mts" | "cts") => Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Parse one source file into a module.
///
/// Recoverable syntax errors are reported as failures too: a file that does
/// not parse cleanly is not analyzed at all.
pub fn parse_source(code: String, file_path: &Path, source_map: &Arc<SourceMap>) -> Result<Module> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.to_path_buf()).into(), code);

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );

        let describe = |span: swc_common::Span, msg: &str| {
            let loc = source_map.lookup_char_pos(span.lo);
            anyhow!(
                "{}:{}:{}: {}",
                file_path.display(),
                loc.line,
                loc.col_display + 1,
                msg
            )
        };

        let module = parser
            .parse_module()
            .map_err(|e| describe(e.span(), &e.kind().msg()))?;

        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(describe(e.span(), &e.kind().msg()));
        }

        Ok(module)
    })
}
