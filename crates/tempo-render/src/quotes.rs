//! Quote of the minute.
//!
//! The order of [`QUOTES`] is part of the displayed output: the quote shown
//! for a given minute is `QUOTES[minute % QUOTES.len()]`.

pub const QUOTES: [&str; 30] = [
    "Time is the most valuable currency - spend it wisely.",
    "Don't watch the clock; do what it does. Keep going.",
    "The bad news is time flies. The good news is you're the pilot.",
    "Yesterday is history, tomorrow is a mystery, today is a gift.",
    "Each sunrise brings new opportunities; each sunset brings reflection.",
    "Time doesn't change us, it just unfolds us.",
    "The key is not to prioritize what's on your schedule, but to schedule your priorities.",
    "Lost time is never found again.",
    "The night is darkest just before the dawn.",
    "Make each day your masterpiece.",
    "Life is not about waiting for the storm to pass, but learning to dance in the rain.",
    "Just when the caterpillar thought the world was over, it became a butterfly.",
    "After every storm, there is a rainbow of hope.",
    "Life is a journey to be experienced, not a problem to be solved.",
    "Life is like the ocean - it can be calm or rough, but it's always beautiful.",
    "The best time to plant a tree was 20 years ago. The second best time is now.",
    "You are never too old to set another goal or to dream a new dream.",
    "Life begins at the end of your comfort zone.",
    "We are all diamonds in the rough, being polished by life's challenges.",
    "Bloom where you are planted.",
    "The heart that loves is always young.",
    "Happiness is not something ready-made. It comes from your own actions.",
    "Sometimes the smallest step in the right direction ends up being the biggest step of your life.",
    "Even the darkest night will end and the sun will rise.",
    "Alone we can do so little; together we can do so much.",
    "Where words fail, music speaks.",
    "Peace begins with a smile.",
    "You are braver than you believe, stronger than you seem, and smarter than you think.",
    "Every flower must grow through dirt.",
    "The most precious things in life are not things, but moments.",
];

/// Quote for a minute of the hour.
pub fn quote_for_minute(minute: u32) -> &'static str {
    QUOTES[minute as usize % QUOTES.len()]
}
