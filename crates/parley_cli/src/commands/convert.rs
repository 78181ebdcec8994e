//! `parley convert`

use std::path::{Path, PathBuf};

use anyhow::Result;
use parley_aix::ConvertConfig;

use super::{build_reducer, load_conversation};
use crate::output;

pub async fn handle(
    input: &Path,
    assets: Option<PathBuf>,
    config: ConvertConfig,
    pretty: bool,
) -> Result<()> {
    let conversation = load_conversation(input).await?;
    let reducer = build_reducer(assets, config);
    let converted = reducer.reduce_with_diagnostics(&conversation.messages).await?;

    if output::is_json() {
        return output::data("conversion", &converted);
    }

    for diagnostic in &converted.diagnostics {
        output::warning(&diagnostic.to_string());
    }

    let json = if pretty {
        converted.request.to_json_pretty()?
    } else {
        serde_json::to_string(&converted.request)?
    };
    println!("{json}");
    Ok(())
}
