pub const FALLBACK_REASONING: &str =
	"The model did not produce output in the requested structured format. The raw output follows as the answer.";

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct StructuredAnswer {
	pub reasoning: String,
	pub final_answer: String,
}

/// Outcome of parsing the generation model's raw output. Parsing never
/// fails; non-conforming output becomes `Fallback` with the text preserved
/// verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
	Structured(StructuredAnswer),
	Fallback { raw: String },
}

impl GenerationOutcome {
	pub fn into_answer(self) -> StructuredAnswer {
		match self {
			Self::Structured(answer) => answer,
			Self::Fallback { raw } => StructuredAnswer {
				reasoning: FALLBACK_REASONING.to_string(),
				final_answer: raw,
			},
		}
	}
}

pub fn parse_generation(raw: &str) -> GenerationOutcome {
	let candidate = strip_code_fence(raw.trim());

	match serde_json::from_str::<StructuredAnswer>(candidate) {
		Ok(answer) => GenerationOutcome::Structured(answer),
		Err(err) => {
			tracing::warn!(error = %err, "Generation output is not valid structured JSON. Falling back to raw text.");

			GenerationOutcome::Fallback { raw: raw.to_string() }
		},
	}
}

fn strip_code_fence(text: &str) -> &str {
	let Some(inner) = text.strip_prefix("```") else {
		return text;
	};
	let inner = inner.strip_prefix("json").unwrap_or(inner);
	let Some(inner) = inner.strip_suffix("```") else {
		return text;
	};

	inner.trim()
}
