use swc_common::comments::{Comments, SingleThreadedComments};
use swc_common::sync::Lrc;
use swc_common::SourceMap;
use swc_compiler_base::PrintArgs;
use swc_ecma_ast::Module;

/// Prints `module` back to source code.
pub fn ast_to_str(
    cm: &Lrc<SourceMap>,
    module: &Module,
    print_args: PrintArgs<'_>,
) -> anyhow::Result<String> {
    let output = swc_compiler_base::print(cm.clone(), module, print_args)?;
    Ok(output.code)
}

/// Round-trips `src` through the parser and printer, so hand-written
/// expectations can be compared against printed output.
pub fn normalise_src(name: &str, src: &str, print_args: PrintArgs) -> String {
    let mut pargs = print_args;

    // Declared at function level so it outlives the borrow in `pargs`.
    let own_comments: Option<SingleThreadedComments>;
    if pargs.comments.is_none() {
        own_comments = Some(SingleThreadedComments::default());
        pargs.comments = own_comments.as_ref().map(|c| c as &dyn Comments);
    }

    let (cm, parsed) = swc_utils_parse::parse_ecma_src_comments(name, src, pargs.comments);
    ast_to_str(&cm, &parsed, pargs).unwrap()
}
