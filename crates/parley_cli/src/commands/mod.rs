//! Command dispatch.

pub mod convert;
pub mod inspect;
pub mod resize;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parley_aix::{ConversationReducer, ConvertConfig};
use parley_assets::{AssetStore, DirAssetStore, ImageCrateResizer, InMemoryAssetStore};
use parley_core::Conversation;

use crate::cli::{Cli, Command};
use crate::output;

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            input,
            assets,
            model_resize,
            user_resize,
            pretty,
        } => {
            let mut config = ConvertConfig::from_env();
            if let Some(setting) = model_resize {
                config = config.with_model_image_resize(setting.0);
            }
            if let Some(setting) = user_resize {
                config = config.with_user_image_resize(setting.0);
            }
            convert::handle(&input, assets, config, pretty).await
        }
        Command::Inspect { input, assets } => {
            inspect::handle(&input, assets, ConvertConfig::from_env()).await
        }
        Command::Resize {
            image,
            mode,
            target,
            out,
        } => resize::handle(&image, mode, target, out).await,
    }
}

pub(crate) async fn load_conversation(path: &Path) -> Result<Conversation> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let conversation = Conversation::from_json(&json)
        .with_context(|| format!("{} is not a valid conversation", path.display()))?;

    // The reducer drops misplaced system messages itself; just say so up front.
    if let Err(e) = conversation.validate() {
        output::warning(&e.to_string());
    }
    Ok(conversation)
}

pub(crate) fn build_reducer(assets: Option<PathBuf>, config: ConvertConfig) -> ConversationReducer {
    let store: Arc<dyn AssetStore> = match assets {
        Some(dir) => Arc::new(DirAssetStore::new(dir)),
        None => Arc::new(InMemoryAssetStore::new()),
    };
    ConversationReducer::new(store, Arc::new(ImageCrateResizer::new()), config)
}
