const TRANSCRIPT_SLOT: &str = "{transcript}";

pub const ANALYZE_TEMPLATE: &str = include_str!("./prompts/analyze.txt");
pub const QUIZ_TEMPLATE: &str = include_str!("./prompts/quiz.txt");

fn render(template: &str, transcript: &str) -> String {
    template.replacen(TRANSCRIPT_SLOT, transcript.trim(), 1)
}

pub fn analyze_prompt(transcript: &str) -> String {
    render(ANALYZE_TEMPLATE, transcript)
}

pub fn quiz_prompt(transcript: &str) -> String {
    render(QUIZ_TEMPLATE, transcript)
}
