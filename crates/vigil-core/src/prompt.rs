//! Prompt composition for generation and voice selection.

use vigil_types::{GenerationRequest, Voice, DEFAULT_LANGUAGE};

/// Length target used when an emotion request does not carry one.
pub const DEFAULT_PRAYER_LENGTH: u32 = 100;

/// Composes the user prompt for a generation request.
///
/// `content` is used verbatim, then `emotion`, then `topic`. Blank fields
/// count as absent. Returns `None` when none of them is usable.
pub fn compose_user_prompt(req: &GenerationRequest) -> Option<String> {
    if let Some(content) = non_blank(&req.content) {
        return Some(content.to_string());
    }

    if let Some(emotion) = non_blank(&req.emotion) {
        let length = req.prayer_length.unwrap_or(DEFAULT_PRAYER_LENGTH);
        let language = non_blank(&req.current_language).unwrap_or(DEFAULT_LANGUAGE);
        return Some(format!(
            "請針對「{emotion}」情緒，寫一段禱告文，長度約{length}字，並附上合適的聖經經文與簡短解說。語言：{language}"
        ));
    }

    non_blank(&req.topic).map(|topic| {
        format!("請用繁體中文寫一段 100 字內的禱告文，主題是：「{topic}」。最後請加上一句對應的聖經經文出處。")
    })
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

fn voice_menu(indent: &str) -> String {
    Voice::ALL
        .iter()
        .map(|voice| format!("{indent}{}: {}\n", capitalize(voice.as_str()), voice_blurb(*voice)))
        .collect()
}

fn voice_blurb(voice: Voice) -> &'static str {
    match voice {
        Voice::Alloy => "平衡的聲音，適合一般用途，提供清晰度和溫暖感",
        Voice::Echo => "更動態的聲音，可以為通知增添興奮感",
        Voice::Fable => "講故事的聲音，非常適合讀睡前故事或敘述內容",
        Voice::Onyx => "深沉且豐富的聲音，適合權威性指令",
        Voice::Nova => "明亮且歡快的聲音，適合友好的互動",
        Voice::Shimmer => "柔和且舒緩的聲音，適合平靜的環境",
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the voice-selection prompt.
///
/// With a prayer text the model is also asked for delivery instructions.
pub fn voice_selection_prompt(emotion: &str, prayer_text: Option<&str>) -> String {
    match prayer_text.filter(|text| !text.trim().is_empty()) {
        Some(text) => format!(
            "基於用戶情緒「{emotion}」及以下禱告文，請執行兩項任務：\n\
             1. 從以下六個OpenAI TTS語音中選擇最適合的一個：\n\
             {menu}\
             2. 為這段禱告文生成適合的TTS指令：\n\
             \"\"\"\n{text}\n\"\"\"\n\
             請按照以下格式回答：\n\
             VOICE: [選擇的語音名稱，小寫]\n\
             INSTRUCTIONS:\n\
             Voice Affect: [聲音情感描述]\n\
             Tone: [語調描述]\n\
             Pacing: [速度描述]\n\
             Emotions: [情緒描述]\n\
             Pronunciation: [發音重點描述]\n\
             Pauses: [停頓描述]",
            menu = voice_menu("   - "),
        ),
        None => format!(
            "基於用戶的情緒「{emotion}」，請從以下六個OpenAI TTS語音中選擇最適合的一個:\n\
             {menu}\
             請按照以下格式回答：\n\
             VOICE: [選擇的語音名稱，小寫]",
            menu = voice_menu(""),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_wins_over_emotion_and_topic() {
        let req = GenerationRequest {
            content: Some("raw prompt".to_string()),
            emotion: Some("Joy".to_string()),
            topic: Some("感恩".to_string()),
            ..GenerationRequest::default()
        };
        assert_eq!(compose_user_prompt(&req).as_deref(), Some("raw prompt"));
    }

    #[test]
    fn emotion_prompt_uses_defaults() {
        let req = GenerationRequest {
            emotion: Some("焦慮".to_string()),
            ..GenerationRequest::default()
        };
        let prompt = compose_user_prompt(&req).unwrap();
        assert!(prompt.contains("「焦慮」"));
        assert!(prompt.contains("長度約100字"));
        assert!(prompt.ends_with("語言：zh-Hant"));
    }

    #[test]
    fn emotion_prompt_carries_length_and_language() {
        let prompt = compose_user_prompt(&GenerationRequest::for_emotion("Anxiety", "en", 250)).unwrap();
        assert!(prompt.contains("長度約250字"));
        assert!(prompt.ends_with("語言：en"));
    }

    #[test]
    fn topic_prompt() {
        let req = GenerationRequest {
            topic: Some("感恩".to_string()),
            ..GenerationRequest::default()
        };
        assert!(compose_user_prompt(&req).unwrap().contains("主題是：「感恩」"));
    }

    #[test]
    fn blank_fields_are_missing_input() {
        let req = GenerationRequest {
            content: Some("  ".to_string()),
            emotion: Some(String::new()),
            ..GenerationRequest::default()
        };
        assert_eq!(compose_user_prompt(&req), None);
    }

    #[test]
    fn voice_prompt_lists_every_voice() {
        let prompt = voice_selection_prompt("Sadness", None);
        for voice in Voice::ALL {
            assert!(prompt.contains(&capitalize(voice.as_str())));
        }
        assert!(!prompt.contains("INSTRUCTIONS"));
    }

    #[test]
    fn voice_prompt_with_prayer_asks_for_instructions() {
        let prompt = voice_selection_prompt("Sadness", Some("Lord, comfort me."));
        assert!(prompt.contains("Lord, comfort me."));
        assert!(prompt.contains("INSTRUCTIONS:"));
        assert!(prompt.contains("   - Shimmer:"));
    }
}
