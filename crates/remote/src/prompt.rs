//! Prompt construction for the generative match source.

use matcher::Document;
use serde_json::{json, Value};

const INSTRUCTIONS: &str = "\
Analiza los documentos anteriores y detecta fragmentos copiados, parafraseados o muy similares entre ellos.

Reglas:
1. Considera solo fragmentos de al menos 10 palabras.
2. Clasifica cada coincidencia como \"EXACTO\" (texto idéntico), \"PARAFRASIS\" (mismo significado con otras palabras) o \"SIMILAR\" (ideas parecidas).
3. startIndex y endIndex son posiciones de caracteres dentro del documento indicado en sourceDocument.
4. sourceDocument debe ser el nombre exacto del documento, tal como aparece entre paréntesis.
5. similarity es un número entre 0 y 100.

Responde únicamente con JSON válido, sin texto adicional, con esta forma:
{
  \"overallSimilarity\": 0,
  \"matches\": [
    {
      \"originalText\": \"fragmento del primer documento\",
      \"matchedText\": \"fragmento del documento comparado\",
      \"similarity\": 0,
      \"startIndex\": 0,
      \"endIndex\": 0,
      \"sourceDocument\": \"nombre del documento\",
      \"type\": \"EXACTO\"
    }
  ],
  \"summary\": \"resumen breve\",
  \"recommendations\": []
}
";

/// Builds the analysis prompt, cutting every document to `max_chars`
/// characters.
pub fn build_prompt(documents: &[Document], max_chars: usize) -> String {
    let mut prompt = String::from("Documentos a comparar:\n\n");
    for (idx, doc) in documents.iter().enumerate() {
        let content: String = doc.content.chars().take(max_chars).collect();
        prompt.push_str(&format!("DOCUMENTO {} ({}):\n{}\n\n", idx + 1, doc.name, content));
    }
    prompt.push_str(INSTRUCTIONS);
    prompt
}

/// `generateContent` request body for a single-turn text prompt.
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": 0.0,
            "responseMimeType": "application/json"
        }
    })
}
