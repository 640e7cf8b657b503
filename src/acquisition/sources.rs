//! Curated CC0 / royalty-free face images used by `facebench download`.
//!
//! Replace an entry when its host stops serving it.

pub const IMAGE_URLS: &[&str] = &[
    // Frontal faces
    "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=600",
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=600",
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=600",
    "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=600",
    "https://images.unsplash.com/photo-1519389950473-47ba0277781c?w=600",
    "https://images.unsplash.com/photo-1506126613408-eca07ce68773?w=600",
    // Profile shots
    "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=600",
    "https://images.unsplash.com/photo-1511632765486-a01980e01a18?w=600",
    // Groups
    "https://images.unsplash.com/photo-1552664730-d307ca884978?w=600",
    "https://images.unsplash.com/photo-1529156069898-49953e39b3ac?w=600",
    // Mixed lighting
    "https://images.unsplash.com/photo-1511895426328-dc8714191300?w=600",
    "https://images.unsplash.com/photo-1529626455594-4ff0802cfb7e?w=600",
    "https://images.unsplash.com/photo-1516975080664-ed2fc6a32937?w=600",
    // Pexels
    "https://images.pexels.com/photos/1181690/pexels-photo-1181690.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/3785079/pexels-photo-3785079.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/3784633/pexels-photo-3784633.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/3945706/pexels-photo-3945706.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/3807517/pexels-photo-3807517.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/3945683/pexels-photo-3945683.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/1181272/pexels-photo-1181272.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/1231230/pexels-photo-1231230.jpeg?auto=compress&cs=tinysrgb&w=600",
];
