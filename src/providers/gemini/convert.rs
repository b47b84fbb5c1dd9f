//! Conversation -> Gemini request conversion

use crate::types::{Conversation, InvokeOptions, Part, Role};

use super::types::{Content, GenerateContentRequest, GenerationConfig, Part as GeminiPart};

/// Gemini names the assistant role `model`.
pub fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Build the request body from the full ordered turn list.
pub fn build_request_body(
    conversation: &Conversation,
    options: &InvokeOptions,
) -> GenerateContentRequest {
    let contents = conversation
        .turns()
        .iter()
        .map(|turn| Content {
            role: Some(gemini_role(turn.role).to_string()),
            parts: turn
                .parts
                .iter()
                .map(|part| match part {
                    Part::Text { value } => GeminiPart::text(value.clone()),
                    Part::FileRef { handle } => {
                        GeminiPart::file_data(handle.uri.clone(), handle.mime_type.clone())
                    }
                })
                .collect(),
        })
        .collect();

    let generation_config = options
        .response_mime_type
        .as_ref()
        .map(|mime| GenerationConfig {
            response_mime_type: Some(mime.clone()),
        });

    GenerateContentRequest {
        contents,
        generation_config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileHandle;

    #[test]
    fn maps_roles_and_parts_in_order() {
        let handle = FileHandle::new("https://files.example/abc", "application/pdf");
        let conversation = Conversation::new()
            .user("read this", std::slice::from_ref(&handle))
            .assistant("done")
            .user("quiz me", &[]);

        let body = build_request_body(&conversation, &InvokeOptions::default());

        let roles: Vec<_> = body.contents.iter().map(|c| c.role.clone().unwrap()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(body.contents[0].parts.len(), 2);
        assert_eq!(body.contents[0].parts[0].text.as_deref(), Some("read this"));
        let file = body.contents[0].parts[1].file_data.as_ref().unwrap();
        assert_eq!(file.file_uri, handle.uri);
        assert_eq!(file.mime_type, handle.mime_type);
        assert!(body.generation_config.is_none());
    }

    #[test]
    fn json_option_sets_response_mime_type() {
        let body = build_request_body(&Conversation::prompt("grade", &[]), &InvokeOptions::json());
        assert_eq!(
            body.generation_config.unwrap().response_mime_type.as_deref(),
            Some("application/json")
        );
    }
}
