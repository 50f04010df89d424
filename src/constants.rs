pub const TIME_SETTINGS: TimeSettings = TimeSettings {
    tick_ms: 1000,
    physics_ms: 32,
    target_fps: 24,
    autosave_ms: 4000,
    encourage_ms: 90_000,
    idle_ms: 20_000,
    splash_ms: 1500,
};

pub const DURATION_LIMITS: DurationLimits = DurationLimits {
    min_minutes: 1,
    max_minutes: 180,
    default_minutes: 25,
    fallback_seconds: 1500,
};

pub const BRAILLE_GRID: BrailleGridSettings = BrailleGridSettings {
    base: 0x2800,
    dot_height: 4,
    dot_width: 2,
};

pub const AMBIENT_SETTINGS: AmbientSettings = AmbientSettings {
    count: 60,
    speed_min: 0.1,
    speed_max: 0.5,
    alpha_min: 0.2,
    alpha_max: 0.6,
};

pub const CONFETTI_SETTINGS: ConfettiSettings = ConfettiSettings {
    count: 160,
    speed_min: 0.6,
    speed_max: 1.6,
    life_min: 60,
    life_max: 180,
    saturation: 0.80,
    lightness: 0.70,
};

pub const GRADIENT: GradientSettings = GradientSettings {
    border_hue: 310.0,
    border_drift: 25.0,
    border_saturation: 0.90,
    border_lightness: 0.75,
    accent_hue: 270.0,
    accent_drift: 20.0,
    accent_saturation: 0.75,
    accent_lightness: 0.70,
};

pub const ENCOURAGEMENTS: [&str; 10] = [
    "You are doing better than you think.",
    "Breathe, then keep going.",
    "Small steps still count.",
    "This is progress.",
    "You are capable, even on slow days.",
    "Your effort matters.",
    "Take it steady, you got this.",
    "Proud of you for showing up.",
    "Focus grows strength.",
    "Keep moving, even gently.",
];

pub struct TimeSettings {
    pub tick_ms: u64,
    pub physics_ms: u64,
    pub target_fps: u64,
    pub autosave_ms: u64,
    pub encourage_ms: u64,
    pub idle_ms: u64,
    pub splash_ms: u64,
}

pub struct DurationLimits {
    pub min_minutes: u64,
    pub max_minutes: u64,
    pub default_minutes: u64,
    pub fallback_seconds: u64,
}

pub struct BrailleGridSettings {
    pub base: u32,
    pub dot_height: usize,
    pub dot_width: usize,
}

pub struct AmbientSettings {
    pub count: usize,
    pub speed_min: f32,
    pub speed_max: f32,
    pub alpha_min: f32,
    pub alpha_max: f32,
}

pub struct ConfettiSettings {
    pub count: usize,
    pub speed_min: f32,
    pub speed_max: f32,
    pub life_min: i32,
    pub life_max: i32,
    pub saturation: f32,
    pub lightness: f32,
}

pub struct GradientSettings {
    pub border_hue: f32,
    pub border_drift: f32,
    pub border_saturation: f32,
    pub border_lightness: f32,
    pub accent_hue: f32,
    pub accent_drift: f32,
    pub accent_saturation: f32,
    pub accent_lightness: f32,
}
