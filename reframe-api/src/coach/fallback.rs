//! Static advice returned when the model cannot produce a usable answer

use reframe_common::models::{Analysis, Reflection};

const ROOT_CAUSE: &str = "This issue likely stems from a complex interplay of ingrained neural pathways, environmental triggers, and reinforcement patterns that have developed over time. Your brain has formed strong associations between specific situations and your current response behaviors, creating an automatic reaction cycle. Additionally, underlying psychological factors such as past experiences, belief systems, and emotional regulation strategies are likely maintaining this pattern despite your conscious desire for change.";

const QUICK_FIX: &str = "Implement a pattern-interruption technique by consciously introducing a 90-second pause whenever you notice the problematic behavior beginning. During this pause, practice deep diaphragmatic breathing (4 counts in, 6 counts out) while mentally labeling your emotions without judgment. This activates your prefrontal cortex, reducing amygdala reactivity and creating space for conscious choice. Follow this pause with a pre-planned alternative response that you've rehearsed mentally at least 5 times before encountering the situation.";

const NEW_HABIT: &str = "Establish a daily 10-minute mindfulness practice specifically focused on body awareness and emotional recognition related to this issue. Begin each morning by scanning your body for tension patterns associated with the problem, then practice naming and accepting any emotions that arise without attempting to change them. Research shows this builds the neural pathways for emotional regulation and self-awareness. Pair this practice with a specific environmental change that removes triggers or creates friction against the unwanted behavior, such as rearranging your physical space or creating accountability through daily check-ins with a trusted person.";

const MINDSET_SHIFT: &str = "Reframe this challenge as a valuable data-gathering experiment about your own psychology rather than a personal failing or character flaw. Each instance of the behavior provides crucial information about your triggers, needs, and response patterns. Adopt a scientist's perspective by keeping a structured observation journal documenting antecedents, behaviors, and consequences. This cognitive restructuring technique creates psychological distance from the problem, reducing shame and self-criticism while engaging your analytical abilities. Remember that behavioral patterns develop for adaptive reasons - understanding the original purpose of this behavior can reveal the legitimate need it's attempting to meet.";

const LONG_TERM_ADVICE: &str = "Sustainable transformation requires a comprehensive approach addressing cognitive, emotional, behavioral, and environmental dimensions simultaneously. Begin by mapping your complete behavior cycle, identifying at least three potential intervention points where you can apply different strategies. Develop specific implementation intentions in the format 'When X happens, I will do Y' for each intervention point, and rehearse these mentally daily. Establish a progressive measurement system tracking both process metrics (how consistently you apply new strategies) and outcome metrics (changes in frequency/intensity of the issue). Build in regular reflection periods every two weeks to assess progress, adjust strategies, and celebrate small improvements to maintain motivation. Create environmental scaffolding by enlisting appropriate social support, modifying your physical environment, and establishing routines that naturally reinforce your desired behaviors. Remember that setbacks are an informative part of the change process rather than failures.";

const REFLECTION: &str = "Thank you for sharing your thoughts with such honesty and vulnerability. I notice how you're navigating complex emotions around this situation, balancing your desire for progress with natural feelings of uncertainty. The self-awareness you demonstrate in recognizing your patterns is a significant strength that will serve you well in this journey. Your reflection shows a deep capacity for insight even amid challenging circumstances.";

const MICRO_ADVICE: &str = "Consider taking 10 minutes today to write down three specific instances when you've successfully navigated similar challenges in the past, focusing on the exact strategies and internal resources you used. This practice activates your brain's pattern recognition for solution-finding rather than problem-focusing, and research shows that recalling past successes increases self-efficacy for current challenges.";

pub fn analysis() -> Analysis {
    Analysis {
        root_cause: ROOT_CAUSE.to_string(),
        quick_fix: QUICK_FIX.to_string(),
        new_habit: NEW_HABIT.to_string(),
        mindset_shift: MINDSET_SHIFT.to_string(),
        long_term_advice: LONG_TERM_ADVICE.to_string(),
    }
}

pub fn reflection() -> Reflection {
    Reflection {
        reflection: REFLECTION.to_string(),
        micro_advice: MICRO_ADVICE.to_string(),
    }
}
