use std::path::Path;

use swc_common::comments::Comments;
use swc_common::sync::Lrc;
use swc_common::{FileName, SourceFile, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, EsSyntax, StringInput, Syntax};
use swc_ecma_parser::{Capturing, Parser, TsSyntax};

/// Picks a parser syntax from the file extension.
///
/// `.ts`/`.tsx` parse as TypeScript; everything else parses as
/// ECMAScript with JSX enabled, since mini-program sources are
/// usually `.js` files containing JSX.
pub fn syntax_for_filename(filename: &str) -> Syntax {
    if filename.ends_with(".ts") || filename.ends_with(".tsx") {
        Syntax::Typescript(TsSyntax {
            tsx: filename.ends_with(".tsx"),
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        })
    }
}

pub fn create_lexer<'a>(fm: &'a SourceFile, comments: Option<&'a dyn Comments>) -> Lexer<'a> {
    let filename = fm.name.to_string();
    Lexer::new(
        syntax_for_filename(&filename),
        Default::default(),
        StringInput::from(fm),
        comments,
    )
}

pub fn create_parser<'a>(
    fm: &'a Lrc<SourceFile>,
    comments: Option<&'a dyn Comments>,
) -> Parser<Capturing<Lexer<'a>>> {
    let lexer = create_lexer(fm, comments);
    let capturing = Capturing::new(lexer);

    Parser::new_from(capturing)
}

/// Parses the file at `path` with content `body` into `cm`.
///
/// The source file is registered as `FileName::Real(path)`, so spans in
/// the returned module resolve back to the on-disk file name.
pub fn parse_module_file(
    cm: &Lrc<SourceMap>,
    path: &Path,
    body: impl Into<String>,
    comments: Option<&dyn Comments>,
) -> Result<Module, swc_ecma_parser::error::Error> {
    let fm = cm.new_source_file(Lrc::new(FileName::Real(path.to_path_buf())), body.into());
    let mut parser = create_parser(&fm, comments);
    parser.parse_module()
}

/// Parses an in-memory snippet under a synthetic name. Panics on syntax
/// errors; meant for tests.
pub fn parse_ecma_src<TName, TBody>(name_str: TName, body: TBody) -> (Lrc<SourceMap>, Module)
where
    TName: Into<String>,
    TBody: ToString,
{
    parse_ecma_src_comments(name_str, body, None)
}

pub fn parse_ecma_src_comments<TName, TBody>(
    name_str: TName,
    body: TBody,
    comments: Option<&dyn Comments>,
) -> (Lrc<SourceMap>, Module)
where
    TName: Into<String>,
    TBody: ToString,
{
    let cm = Lrc::<SourceMap>::default();
    let fname: Lrc<FileName> = Lrc::new(FileName::Custom(name_str.into()));
    let fm = cm.new_source_file(fname, body.to_string());

    let mut parser = create_parser(&fm, comments);
    let module = parser.parse_module().unwrap();

    (cm, module)
}
