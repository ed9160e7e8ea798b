//! Compiles [`GenerationOptions`] into the instruction text sent with the images.

use crate::swap::options::{FaceScale, GenerationOptions, Lighting, SkinTone};

const FRAMING: &str = "Perform a high-quality, realistic face swap.

Inputs:
1. Source Face: The face to be used (features, eyes, nose, mouth, skin texture).
2. Target Body: The recipient body/head (head shape, hair, pose, lighting, background).

Instructions:
- Replace the face in the Target Body image with the face from Source Face.";

const PRESERVE_EXPRESSION: &str =
    "Preserve the expression of the Source Face if possible, adapted to the Target's angle.";

const PHOTOREALISTIC: &str = "Output a photorealistic image.";

/// Label that introduces the user's free-text instruction.
pub const ADDITIONAL_INSTRUCTION_LABEL: &str = "Additional User Instruction: ";

/// Returns the face-scale clause.
pub fn scale_clause(scale: FaceScale) -> &'static str {
    match scale {
        FaceScale::Default => {
            "Ensure perfect anatomical proportions. The size of the face features must match the skull size of the Target Body."
        }
        FaceScale::Smaller => {
            "Reduce the scale of the facial features (eyes, nose, mouth) slightly (approx 90%) relative to the head size. Ensure the face does not look too large for the skull."
        }
        FaceScale::Larger => {
            "Increase the scale of the facial features slightly (approx 110%) to fill the face area more fully. Ensure the face does not look too small."
        }
    }
}

/// Returns the skin-tone clause.
pub fn tone_clause(tone: SkinTone) -> &'static str {
    match tone {
        SkinTone::MatchTarget => {
            "Critically important: Maintain the lighting, shadows, and skin tone of the Target Body to ensure a seamless blend."
        }
        SkinTone::PreserveSource => {
            "Preserve the original skin tone and texture of the Source Face as much as possible, while blending the edges naturally into the Target Body."
        }
        SkinTone::Lighter => {
            "Adjust the generated face skin tone to be lighter/brighter than the target, giving it a high-key look."
        }
        SkinTone::Darker => {
            "Adjust the generated face skin tone to be darker/richer than the target, giving it a deep tone."
        }
    }
}

/// Returns the lighting clause.
pub fn lighting_clause(lighting: Lighting) -> &'static str {
    match lighting {
        Lighting::Natural => {
            "Ensure the lighting direction on the face matches the Target Body exactly."
        }
        Lighting::Warm => {
            "Apply a warm, golden color temperature to the face, simulating sunset or indoor warm lighting."
        }
        Lighting::Cool => {
            "Apply a cool, bluish color temperature to the face, simulating fluorescent or night lighting."
        }
        Lighting::Contrast => {
            "Increase the contrast on the face for a dramatic, cinematic look."
        }
    }
}

/// Builds the prompt for a face swap request.
///
/// The output depends only on `options`. The user instruction is appended
/// unchanged as the last line when it contains anything besides whitespace.
pub fn compile_prompt(options: &GenerationOptions) -> String {
    let clauses = [
        scale_clause(options.face_scale),
        tone_clause(options.skin_tone),
        lighting_clause(options.lighting),
        PRESERVE_EXPRESSION,
        PHOTOREALISTIC,
    ];

    let mut prompt = String::from(FRAMING);
    for clause in clauses {
        prompt.push_str("\n- ");
        prompt.push_str(clause);
    }

    if !options.instructions.trim().is_empty() {
        prompt.push_str("\n\n");
        prompt.push_str(ADDITIONAL_INSTRUCTION_LABEL);
        prompt.push_str(&options.instructions);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{AspectRatio, ImageSize};

    fn count_of(prompt: &str, candidates: &[&str]) -> usize {
        candidates.iter().filter(|c| prompt.contains(**c)).count()
    }

    #[test]
    fn test_deterministic() {
        let opts = GenerationOptions::new()
            .with_skin_tone(SkinTone::Darker)
            .with_lighting(Lighting::Cool)
            .with_face_scale(FaceScale::Larger)
            .with_instructions("make the smile wider");
        assert_eq!(compile_prompt(&opts), compile_prompt(&opts.clone()));
    }

    #[test]
    fn test_output_settings_do_not_affect_prompt() {
        let a = GenerationOptions::new();
        let b = GenerationOptions::new()
            .with_aspect_ratio(AspectRatio::Landscape)
            .with_image_size(ImageSize::FourK);
        assert_eq!(compile_prompt(&a), compile_prompt(&b));
    }

    #[test]
    fn test_exactly_one_tone_clause() {
        let all: Vec<&str> = SkinTone::ALL.iter().map(|t| tone_clause(*t)).collect();
        for tone in SkinTone::ALL {
            let prompt = compile_prompt(&GenerationOptions::new().with_skin_tone(tone));
            assert_eq!(count_of(&prompt, &all), 1, "tone {tone}");
            assert!(prompt.contains(tone_clause(tone)));
        }
    }

    #[test]
    fn test_unknown_tone_matches_default_prompt() {
        let unknown = GenerationOptions::new().with_skin_tone(SkinTone::from_value("sepia"));
        let matched = GenerationOptions::new().with_skin_tone(SkinTone::MatchTarget);
        assert_eq!(compile_prompt(&unknown), compile_prompt(&matched));
    }

    #[test]
    fn test_exactly_one_scale_and_lighting_clause() {
        let scales: Vec<&str> = FaceScale::ALL.iter().map(|s| scale_clause(*s)).collect();
        let lights: Vec<&str> = Lighting::ALL.iter().map(|l| lighting_clause(*l)).collect();
        for scale in FaceScale::ALL {
            for light in Lighting::ALL {
                let opts = GenerationOptions::new()
                    .with_face_scale(scale)
                    .with_lighting(light);
                let prompt = compile_prompt(&opts);
                assert_eq!(count_of(&prompt, &scales), 1);
                assert_eq!(count_of(&prompt, &lights), 1);
            }
        }
    }

    #[test]
    fn test_clause_order() {
        let prompt = compile_prompt(&GenerationOptions::new());
        let framing = prompt.find("Perform a high-quality").unwrap();
        let scale = prompt.find(scale_clause(FaceScale::Default)).unwrap();
        let tone = prompt.find(tone_clause(SkinTone::MatchTarget)).unwrap();
        let light = prompt.find(lighting_clause(Lighting::Natural)).unwrap();
        let expression = prompt.find(PRESERVE_EXPRESSION).unwrap();
        let photo = prompt.find(PHOTOREALISTIC).unwrap();
        assert!(framing < scale && scale < tone && tone < light);
        assert!(light < expression && expression < photo);
        assert!(prompt.ends_with(PHOTOREALISTIC));
    }

    #[test]
    fn test_instruction_appended_verbatim_last() {
        let text = "Make the expression happier, remove glasses";
        let prompt = compile_prompt(&GenerationOptions::new().with_instructions(text));
        assert!(prompt.ends_with(&format!("{ADDITIONAL_INSTRUCTION_LABEL}{text}")));
        assert_eq!(prompt.matches(ADDITIONAL_INSTRUCTION_LABEL).count(), 1);
    }

    #[test]
    fn test_blank_instruction_omitted() {
        for text in ["", "   ", "\n\t "] {
            let prompt = compile_prompt(&GenerationOptions::new().with_instructions(text));
            assert!(!prompt.contains(ADDITIONAL_INSTRUCTION_LABEL));
            assert_eq!(prompt, compile_prompt(&GenerationOptions::new()));
        }
    }
}
