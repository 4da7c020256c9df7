//! Text output for compiled sheets.

use sheetfn_engine::CompiledUnit;
use sheetfn_engine::engine::eval;
use sheetfn_engine::error::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderOptions {
    pub include_test_code: bool,
    pub run: bool,
}

/// Render one sheet's block. Nothing is returned on failure, so a sheet
/// either prints completely or not at all.
pub fn render_unit(sheet: &str, unit: &CompiledUnit, options: RenderOptions) -> Result<String> {
    let mut out = unit.dialect.line_comment(&format!("Code for sheet: {}", sheet));
    out.push('\n');
    out.push_str(&unit.source);
    out.push('\n');

    if options.include_test_code {
        out.push('\n');
        out.push_str(&unit.harness());
        out.push('\n');
    }

    if options.run {
        let computed = eval::run_example(unit)?;
        out.push_str(&format!(
            "Output for {}: {}\n",
            unit.name,
            eval::format_map(&computed)
        ));
    }

    Ok(out)
}
