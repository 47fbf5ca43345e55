// Local sentence embedder: all-MiniLM-L6-v2 through ONNX Runtime.
//
// Each text is tokenized, run through the BERT encoder, and mean-pooled over
// its real tokens (weighted by the attention mask) into one 384-dimensional
// vector. Inference is CPU-bound and runs on spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::Embedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Texts per inference call. Long complaint narratives pad every row of a
/// batch to the longest one, so batches are kept small.
const BATCH_SIZE: usize = 32;

/// Sentence embedder backed by a local ONNX model.
pub struct OnnxEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxEmbedder {
    /// Load the model and tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Run `grievance download-model` first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `grievance download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `grievance download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;

        debug!("Loaded sentence embedding model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl Embedder for OnnxEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || -> Result<Vec<Vec<f64>>> {
            let mut out = Vec::with_capacity(texts.len());
            for chunk in texts.chunks(BATCH_SIZE) {
                out.extend(embed_sync(&session, &tokenizer, chunk)?);
            }
            Ok(out)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Tokenization, inference, and mean pooling for one batch.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch_size]);
    }

    // BERT inputs: token ids and attention mask padded with 0,
    // token_type_ids all 0 for single-sentence input
    let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut token_type_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let ids = enc.get_ids();
        let mask = enc.get_attention_mask();
        let pad_len = max_len - ids.len();

        input_ids_flat.extend(ids.iter().map(|&id| id as i64));
        attention_mask_flat.extend(mask.iter().map(|&m| m as i64));
        token_type_ids_flat.extend(std::iter::repeat_n(0i64, ids.len()));

        input_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
        attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
        token_type_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids_flat)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat.clone()))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids_flat))
        .context("Failed to create token_type_ids tensor")?;

    // last_hidden_state: [batch, seq_len, 384]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    let expected = batch_size * max_len * EMBEDDING_DIM;
    if hidden_states.len() != expected {
        anyhow::bail!(
            "Embedding model returned {} values, expected {} ({} x {} x {})",
            hidden_states.len(),
            expected,
            batch_size,
            max_len,
            EMBEDDING_DIM
        );
    }

    Ok(mean_pool(&hidden_states, &attention_mask_flat, batch_size, max_len))
}

/// Average token vectors per row, counting only positions where the mask is set.
fn mean_pool(hidden: &[f32], mask: &[i64], batch_size: usize, max_len: usize) -> Vec<Vec<f64>> {
    let mut embeddings = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        let mut sum = vec![0.0_f64; EMBEDDING_DIM];
        let mut mask_sum = 0.0_f64;

        for j in 0..max_len {
            let mask_val = mask[i * max_len + j] as f64;
            if mask_val > 0.0 {
                mask_sum += mask_val;
                let offset = (i * max_len + j) * EMBEDDING_DIM;
                for (k, slot) in sum.iter_mut().enumerate() {
                    *slot += hidden[offset + k] as f64 * mask_val;
                }
            }
        }

        if mask_sum > 0.0 {
            for val in &mut sum {
                *val /= mask_sum;
            }
        }

        embeddings.push(sum);
    }

    debug!(batch_size, dim = EMBEDDING_DIM, "Computed sentence embeddings");

    embeddings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pool_ignores_padding() {
        // Two rows, two positions; row 0 has one real token, row 1 has two.
        let mut hidden = vec![0.0_f32; 2 * 2 * EMBEDDING_DIM];
        hidden[0] = 2.0; // row 0, pos 0
        hidden[EMBEDDING_DIM] = 100.0; // row 0, pos 1 (padding)
        hidden[2 * EMBEDDING_DIM] = 1.0; // row 1, pos 0
        hidden[3 * EMBEDDING_DIM] = 3.0; // row 1, pos 1
        let mask = vec![1, 0, 1, 1];

        let pooled = mean_pool(&hidden, &mask, 2, 2);
        assert_eq!(pooled.len(), 2);
        assert!((pooled[0][0] - 2.0).abs() < 1e-9);
        assert!((pooled[1][0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_pool_all_masked_is_zero() {
        let hidden = vec![5.0_f32; EMBEDDING_DIM];
        let pooled = mean_pool(&hidden, &[0], 1, 1);
        assert!(pooled[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_load_missing_model_fails() {
        let dir = std::env::temp_dir().join("grievance-test-no-model");
        let err = OnnxEmbedder::load(&dir).err().expect("load should fail");
        assert!(err.to_string().contains("download-model"));
    }
}
