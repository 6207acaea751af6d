//! Analysis Prompt

/// Placeholder replaced by the trimmed topic.
const TOPIC_PLACEHOLDER: &str = "{topic}";

const PROMPT_TEMPLATE: &str = r#"You are an expert podcast analyst. Your task is to find popular podcasts that have discussed a given topic from OPPOSING or significantly different viewpoints.

For the topic: "{topic}"

1. Identify real, well-known podcasts that have covered this topic with measurably different stances
2. Analyze their positions based on your knowledge of these podcasts
3. Find the two podcasts with the most clearly contrasting viewpoints

Return a JSON object (and NOTHING else — no markdown, no backticks, no explanation, just raw JSON) in this exact format:
{
  "topic": "the topic",
  "podcast_left": {
    "name": "Podcast Name",
    "episode": "Episode title or description",
    "url": "https://podcast-url.com",
    "hosts": "Host name(s)",
    "stance_label": "One-sentence label for their position",
    "stance_detail": "2-3 sentences explaining their position on the topic",
    "summary": "3-4 sentences summarizing what they argue, their key evidence, and their conclusion"
  },
  "podcast_right": {
    "name": "Podcast Name",
    "episode": "Episode title or description",
    "url": "https://podcast-url.com",
    "hosts": "Host name(s)",
    "stance_label": "One-sentence label for their position",
    "stance_detail": "2-3 sentences explaining their position on the topic",
    "summary": "3-4 sentences summarizing what they argue, their key evidence, and their conclusion"
  },
  "key_differences": [
    {
      "dimension": "Topic dimension (e.g. Economic Impact)",
      "left_view": "What podcast_left argues on this dimension",
      "right_view": "What podcast_right argues on this dimension"
    },
    {
      "dimension": "Another dimension",
      "left_view": "...",
      "right_view": "..."
    },
    {
      "dimension": "Third dimension",
      "left_view": "...",
      "right_view": "..."
    }
  ]
}

Use real, well-known podcasts with significant audiences. Choose podcasts that genuinely have contrasting views — not just slightly different perspectives. The contrast should be meaningful and interesting."#;

/// Render the analysis prompt for a topic.
///
/// The topic is trimmed before interpolation. Only the single placeholder is
/// substituted, so braces inside the topic are inserted literally.
pub fn build_prompt(topic: &str) -> String {
    PROMPT_TEMPLATE.replacen(TOPIC_PLACEHOLDER, topic.trim(), 1)
}
