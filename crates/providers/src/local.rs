//! Local generation backend — runs a GGUF-quantized model on your hardware.
//!
//! Uses [Candle](https://github.com/huggingface/candle) (Rust-native ML) to
//! run llama-family models with no network access after the first download.
//!
//! The conversation is kept as one flat token stream: every user turn and
//! every bot turn is appended and terminated with the model's EOS token, and
//! the whole stream is fed back as the prompt of the next turn.
//!
//! # Example
//! ```bash
//! rustbot chat --model smollm:135m
//! rustbot chat --model /path/to/model.gguf
//! ```

use async_trait::async_trait;
use candle_core::quantized::gguf_file;
use candle_core::{DType, Device, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use candle_transformers::models::quantized_llama as qlm;
use hf_hub::api::sync::Api;
use rustbot_core::error::GenerationError;
use rustbot_core::generation::{Generation, GenerationBackend, GenerationParams, TokenHistory};
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ngram::banned_tokens;
use crate::presets::{is_gguf_path, resolve_preset, PRESETS};

/// Tokenizer repo used when a bare GGUF file has no `tokenizer.json` beside it.
const FALLBACK_TOKENIZER_REPO: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";

/// A backend that runs a quantized model locally via Candle.
///
/// The model is behind a Mutex because Candle inference mutates the KV
/// cache; turns are processed one at a time anyway.
pub struct LocalBackend {
    inner: Arc<Mutex<LocalModelState>>,
    model_name: String,
    params: GenerationParams,
}

/// The loaded model state (tokenizer + weights).
struct LocalModelState {
    model: qlm::ModelWeights,
    tokenizer: Tokenizer,
    device: Device,
    eos_token_id: u32,
}

impl LocalBackend {
    /// Load a model by preset alias or `.gguf` path (downloads if needed).
    ///
    /// Blocking: call from `spawn_blocking` inside async code.
    pub fn load(model_name: &str, params: GenerationParams) -> Result<Self, GenerationError> {
        let state = LocalModelState::load(model_name)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(state)),
            model_name: model_name.to_string(),
            params,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl LocalModelState {
    fn load(model_name: &str) -> Result<Self, GenerationError> {
        let device = Device::Cpu;

        if is_gguf_path(model_name) {
            return Self::load_from_path(Path::new(model_name), &device);
        }

        let preset = resolve_preset(model_name).ok_or_else(|| {
            let known: Vec<_> = PRESETS.iter().map(|p| p.alias).collect();
            GenerationError::ModelNotFound(format!(
                "Unknown local model '{}'. Available presets: {}. Or provide a path to a .gguf file.",
                model_name,
                known.join(", ")
            ))
        })?;

        info!(
            model = model_name,
            repo = preset.repo,
            file = preset.gguf_file,
            "Downloading/loading local model"
        );

        // Download via Hugging Face Hub (cached automatically)
        let api = Api::new().map_err(|e| {
            GenerationError::Network(format!("Failed to initialize Hugging Face Hub API: {e}"))
        })?;

        let model_path = api.model(preset.repo.to_string()).get(preset.gguf_file).map_err(|e| {
            GenerationError::Network(format!(
                "Failed to download model '{}' from '{}': {e}",
                preset.gguf_file, preset.repo
            ))
        })?;

        info!(path = %model_path.display(), "Model file ready");

        let tokenizer_path = api
            .model(preset.tokenizer_repo.to_string())
            .get("tokenizer.json")
            .map_err(|e| {
                GenerationError::Network(format!(
                    "Failed to download tokenizer from '{}': {e}",
                    preset.tokenizer_repo
                ))
            })?;

        let tokenizer = load_tokenizer(&tokenizer_path)?;
        let model = load_weights(&model_path, &device)?;
        Ok(Self::assemble(model, tokenizer, device))
    }

    fn load_from_path(path: &Path, device: &Device) -> Result<Self, GenerationError> {
        if !path.exists() {
            return Err(GenerationError::ModelNotFound(format!(
                "GGUF file not found: {}",
                path.display()
            )));
        }

        info!(path = %path.display(), "Loading local GGUF model");
        let model = load_weights(path, device)?;

        let tokenizer_path = path.with_file_name("tokenizer.json");
        let tokenizer = if tokenizer_path.exists() {
            load_tokenizer(&tokenizer_path)?
        } else {
            warn!(
                repo = FALLBACK_TOKENIZER_REPO,
                "No tokenizer.json found next to GGUF file, downloading a fallback tokenizer"
            );
            let api = Api::new()
                .map_err(|e| GenerationError::Network(format!("Hugging Face Hub API error: {e}")))?;
            let tok_path = api
                .model(FALLBACK_TOKENIZER_REPO.to_string())
                .get("tokenizer.json")
                .map_err(|e| {
                    GenerationError::Network(format!("Failed to download fallback tokenizer: {e}"))
                })?;
            load_tokenizer(&tok_path)?
        };

        Ok(Self::assemble(model, tokenizer, device.clone()))
    }

    fn assemble(model: qlm::ModelWeights, tokenizer: Tokenizer, device: Device) -> Self {
        let eos_token_id = tokenizer
            .token_to_id("</s>")
            .or_else(|| tokenizer.token_to_id("<|endoftext|>"))
            .or_else(|| tokenizer.token_to_id("<|im_end|>"))
            .or_else(|| tokenizer.token_to_id("<|eot_id|>"))
            .unwrap_or(2); // common EOS id

        info!(eos_token_id, "Local model loaded successfully");

        Self {
            model,
            tokenizer,
            device,
            eos_token_id,
        }
    }

    /// One conversational turn: append the user turn, sample, append the reply.
    fn generate(
        &mut self,
        utterance: &str,
        history: Option<TokenHistory>,
        params: &GenerationParams,
    ) -> Result<Generation, GenerationError> {
        let encoding = self
            .tokenizer
            .encode(utterance, false)
            .map_err(|e| GenerationError::Tokenization(e.to_string()))?;

        let mut user_turn = encoding.get_ids().to_vec();
        user_turn.push(self.eos_token_id);

        let mut prompt = history.unwrap_or_default();
        let budget = params.max_history_tokens.saturating_sub(user_turn.len());
        let dropped = prompt.trim_to_window(budget, self.eos_token_id);
        if dropped > 0 {
            debug!(dropped, remaining = prompt.len(), "Trimmed conversation history");
        }
        prompt.extend_from_slice(&user_turn);

        let generated = self.sample(prompt.tokens(), params)?;

        let response = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| GenerationError::Tokenization(format!("Detokenization failed: {e}")))?;

        let mut history = prompt;
        history.extend_from_slice(&generated);
        history.extend_from_slice(&[self.eos_token_id]);

        debug!(
            completion_tokens = generated.len(),
            history_tokens = history.len(),
            "Generation complete"
        );

        Ok(Generation {
            response: response.trim().to_string(),
            history,
        })
    }

    /// Sample up to `max_new_tokens` after `context`, stopping at EOS.
    fn sample(&mut self, context: &[u32], params: &GenerationParams) -> Result<Vec<u32>, GenerationError> {
        let mut logits_processor = LogitsProcessor::from_sampling(params.seed, sampling(params));

        let mut sequence = context.to_vec();
        let mut generated = Vec::new();
        let mut input = Tensor::new(context, &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(map_candle_err)?;
        // index_pos 0 makes the model drop its KV cache from the previous turn.
        let mut index_pos = 0;

        for _ in 0..params.max_new_tokens {
            let logits = self.model.forward(&input, index_pos).map_err(map_candle_err)?;
            index_pos += input.dim(1).map_err(map_candle_err)?;

            let logits = logits
                .squeeze(0)
                .and_then(|l| l.to_dtype(DType::F32))
                .map_err(map_candle_err)?;
            let logits = self.mask_banned(logits, &sequence, params.no_repeat_ngram_size)?;

            let next_token = logits_processor.sample(&logits).map_err(map_candle_err)?;
            if next_token == self.eos_token_id {
                break;
            }

            generated.push(next_token);
            sequence.push(next_token);
            input = Tensor::new(&[next_token][..], &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(map_candle_err)?;
        }

        Ok(generated)
    }

    fn mask_banned(&self, logits: Tensor, sequence: &[u32], n: usize) -> Result<Tensor, GenerationError> {
        let banned = banned_tokens(sequence, n);
        if banned.is_empty() {
            return Ok(logits);
        }

        let mut values = logits.to_vec1::<f32>().map_err(map_candle_err)?;
        for token in banned {
            if let Some(v) = values.get_mut(token as usize) {
                *v = f32::NEG_INFINITY;
            }
        }
        Tensor::new(values.as_slice(), &self.device).map_err(map_candle_err)
    }
}

fn sampling(params: &GenerationParams) -> Sampling {
    let temperature = f64::from(params.temperature);
    if temperature <= 0.0 {
        Sampling::ArgMax
    } else if params.top_k == 0 {
        Sampling::TopP {
            p: f64::from(params.top_p),
            temperature,
        }
    } else {
        Sampling::TopKThenTopP {
            k: params.top_k,
            p: f64::from(params.top_p),
            temperature,
        }
    }
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer, GenerationError> {
    Tokenizer::from_file(path)
        .map_err(|e| GenerationError::Unavailable(format!("Failed to load tokenizer: {e}")))
}

fn load_weights(path: &Path, device: &Device) -> Result<qlm::ModelWeights, GenerationError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| GenerationError::Unavailable(format!("Failed to open model file: {e}")))?;

    let gguf = gguf_file::Content::read(&mut file)
        .map_err(|e| GenerationError::Unavailable(format!("Failed to parse GGUF file: {e}")))?;

    qlm::ModelWeights::from_gguf(gguf, &mut file, device)
        .map_err(|e| GenerationError::Unavailable(format!("Failed to load model weights: {e}")))
}

/// Map Candle errors to GenerationError.
fn map_candle_err(e: candle_core::Error) -> GenerationError {
    GenerationError::Inference(format!("Candle inference error: {e}"))
}

#[async_trait]
impl GenerationBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate(
        &self,
        utterance: &str,
        history: Option<&TokenHistory>,
    ) -> std::result::Result<Generation, GenerationError> {
        let inner = self.inner.clone();
        let utterance = utterance.to_string();
        let history = history.cloned();
        let params = self.params.clone();

        // Run inference on a blocking thread (Candle is CPU-bound)
        tokio::task::spawn_blocking(move || {
            let mut state = inner.blocking_lock();
            state.generate(&utterance, history, &params)
        })
        .await
        .map_err(|e| GenerationError::TaskFailed(format!("Inference task panicked: {e}")))?
    }
}
