//! Prompt templates for the storyteller persona.

use std::str::FromStr;

use super::story_service::StoryError;

/// System prompt sent with every writing request.
pub const WRITER_PERSONA: &str = "You are Isabella, a master storyteller and professional author \
with decades of published work across fiction, screenwriting and long-form narrative.

Directives:
1. Write publishable prose immediately, never drafts or outlines.
2. Show, don't tell. Let subtext carry the narrative.
3. Every scene earns its place. No filler.
4. Characters act from genuine motivation, never plot convenience.
5. Dialogue reveals character or advances plot.
6. Give each story its own voice.
7. Trust the reader.

Write complete scenes only. No explanations.";

/// Requested chapter length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryLength {
    Short,
    Chapter,
    Long,
}

impl StoryLength {
    pub fn word_target(&self) -> &'static str {
        match self {
            StoryLength::Short => "1000-2000 words",
            StoryLength::Chapter => "3000-4000 words",
            StoryLength::Long => "5000-8000 words",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryLength::Short => "short",
            StoryLength::Chapter => "chapter",
            StoryLength::Long => "long",
        }
    }
}

impl FromStr for StoryLength {
    type Err = StoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(StoryLength::Short),
            "chapter" => Ok(StoryLength::Chapter),
            "long" => Ok(StoryLength::Long),
            other => Err(StoryError::Validation(format!(
                "unknown length '{}', expected short, chapter or long",
                other
            ))),
        }
    }
}

pub fn opening_chapter(prompt: &str, genre: &str, length: StoryLength) -> String {
    let genre = if genre.trim().is_empty() || genre.trim().eq_ignore_ascii_case("auto") {
        "Determine the best genre for this story".to_string()
    } else {
        genre.trim().to_string()
    };

    format!(
        "STORY PROMPT: {prompt}

REQUIREMENTS:
- Write the opening chapter/scene of this story
- Length: {length} (aim for {target})
- Genre: {genre}
- Quality: publishable, professional prose
- Opening: a strong hook that draws the reader in immediately
- End: scene closure with momentum toward the next beat

WRITE THE COMPLETE OPENING CHAPTER NOW:",
        prompt = prompt.trim(),
        length = length.as_str(),
        target = length.word_target(),
        genre = genre,
    )
}

pub fn continuation(context: &str) -> String {
    format!(
        "STORY CONTEXT: {}

WRITE THE NEXT CHAPTER:
- Continue from the emotional and narrative momentum established
- Escalate stakes, complexity and character revelation
- Keep the established voice and themes
- Target length: 3000-4000 words
- Open strong, close on a cliffhanger or emotional beat
- No summaries or recaps

WRITE CHAPTER NOW:",
        context.trim()
    )
}

pub fn revision(chapter_num: u32, feedback: &str) -> String {
    format!(
        "CHAPTER TO REVISE: Chapter {}

REVISION NOTES: {}

INSTRUCTIONS:
- Find the root cause behind the feedback, not just its symptoms
- Rewrite the entire chapter with the correction integrated
- Keep character consistency and plot continuity
- Keep what works; transform what doesn't
- Preserve the chapter's emotional arc
- Length: the original length (3000-4000 words)

WRITE THE REVISED CHAPTER NOW:",
        chapter_num,
        feedback.trim()
    )
}
