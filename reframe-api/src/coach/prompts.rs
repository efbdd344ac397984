//! Prompt templates

/// Prompt asking for a five-part analysis of a recurring problem
pub fn analysis_prompt(problem: &str, duration: &str, impact: &str) -> String {
    format!(
        r#"As an expert AI life coach with deep knowledge of psychology, behavioral science, and personal development, provide a comprehensive analysis of this recurring life issue with detailed, evidence-based advice.

Problem: "{problem}"
Duration: {duration}
Impact Level: {impact}

Please provide your in-depth analysis in exactly this JSON format (no additional text):
{{
  "rootCause": "Provide a detailed analysis of the underlying psychological, behavioral, and environmental factors contributing to this issue. Include both conscious and subconscious patterns, potential cognitive biases, and how these factors interact to maintain the current situation. (4-6 sentences)",

  "quickFix": "Offer a specific, immediately actionable solution with detailed implementation steps. Explain the psychological mechanism for why this approach works and how it disrupts existing patterns. Include potential obstacles and how to overcome them. (4-5 sentences)",

  "newHabit": "Recommend a specific new habit to develop with clear guidelines on frequency, duration, and implementation. Explain the neurological and psychological benefits of this habit, how it addresses the root cause, and provide a concrete plan for building this habit successfully. (4-5 sentences)",

  "mindsetShift": "Provide a comprehensive reframing of the situation that challenges existing thought patterns. Include specific cognitive restructuring techniques, perspective-taking exercises, and evidence-based approaches to shift mental models. Explain how this new perspective transforms the experience of the problem. (4-5 sentences)",

  "longTermAdvice": "Deliver a detailed strategic roadmap for sustainable change with multiple interconnected approaches. Include milestone markers, ways to measure progress, strategies for maintaining motivation during setbacks, and how to integrate these changes into a cohesive lifestyle transformation. (5-7 sentences)"
}}

Make all advice highly specific, practical, and actionable. Focus on evidence-based approaches from psychology, neuroscience, and behavioral science. Tailor the advice to the specific problem, duration, and impact level provided."#
    )
}

/// Prompt asking for a reflection and one piece of micro advice
pub fn reflection_prompt(content: &str) -> String {
    format!(
        r#"As a supportive AI life coach with expertise in psychology and personal development, provide a thoughtful, insightful reflection on this journal entry with meaningful, personalized advice.

Journal Entry: "{content}"

Please respond in exactly this JSON format (no additional text):
{{
  "reflection": "Offer a compassionate, psychologically-informed reflection that demonstrates deep understanding of the emotions, thoughts, and patterns expressed. Validate their experience while gently highlighting insights they may have missed. Include specific references to content from their entry. (3-5 sentences)",

  "microAdvice": "Provide one specific, actionable piece of advice tailored to their situation that they can implement today. Include clear implementation steps and explain the psychological benefit of this approach. (2-3 sentences)"
}}

Be empathetic, insightful, and focus on practical wisdom that acknowledges the complexity of their situation."#
    )
}
