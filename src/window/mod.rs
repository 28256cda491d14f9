// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Window-side state driven by actions and cursor detection
//!
//! - `click_through`: the two-channel click-through coordinator
//! - `behavior`: opacity and click-through applied to the window surface
//! - `playback`: seek/play/rate forwarded to the media player

pub mod behavior;
pub mod click_through;
pub mod playback;

pub use behavior::{WindowBehavior, WindowSurface, MAX_OPACITY};
pub use click_through::ClickThroughState;
pub use playback::{MediaPlayer, PlaybackController, NORMAL_RATE};
