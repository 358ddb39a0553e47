use companion_core::profile::{ExplanationStyle, StudentPersona, StudentProfile};

/// Rule-based stand-in for a simulated student. Deterministic and free of
/// external model calls, which keeps feedback turns testable offline.
pub fn student_reply(profile: &StudentProfile, teacher_text: &str, slide_index: usize) -> String {
    let tone = match profile.student_persona {
        StudentPersona::Curious => "I'm curious about this part. ",
        StudentPersona::Quiet => "I'm not sure I follow. ",
        StudentPersona::Distracted => "I kind of lost track. ",
        StudentPersona::Confident => "I think I get it. ",
        StudentPersona::Skeptical => "Are we sure about that? ",
    };

    let ask_for_more = match profile.explanation_style {
        ExplanationStyle::Examples => "Could you give an example",
        ExplanationStyle::Analogy => "Could you share an analogy",
        ExplanationStyle::Socratic => "Could you ask me a guiding question",
        ExplanationStyle::StepByStep => "Could you break it down step by step",
        ExplanationStyle::Concise => "Could you explain it in a different way",
    };

    format!(
        "{tone}On slide {}, I heard: \"{teacher_text}\". {ask_for_more} so I can better understand?",
        slide_index + 1
    )
}
