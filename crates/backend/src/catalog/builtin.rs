//! Built-in emoji taxonomy.

use super::Catalog;

const BUILTIN: &[(&str, &[(&str, [&str; 10])])] = &[
  (
    "faces",
    &[
      ("happy", ["😀", "😁", "😂", "🤣", "😃", "😄", "😅", "😆", "😊", "😇"]),
      ("sad", ["😢", "😭", "😞", "😔", "😟", "😕", "🙁", "☹️", "😣", "😖"]),
      ("love", ["😍", "🥰", "😘", "😗", "😙", "😚", "💕", "💖", "💗", "💘"]),
      ("angry", ["😠", "😡", "🤬", "👿", "💢", "😤", "😾", "🙄", "😒", "🗯️"]),
    ],
  ),
  (
    "nature",
    &[
      ("animals", ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯"]),
      ("plants", ["🌱", "🌲", "🌳", "🌴", "🌵", "🌶️", "🌷", "🌸", "🌹", "🌺"]),
      ("weather", ["☀️", "⛅", "☁️", "🌤️", "⛈️", "🌩️", "🌨️", "❄️", "⛄", "🌊"]),
    ],
  ),
  (
    "objects",
    &[
      ("technology", ["💻", "📱", "⌨️", "🖥️", "🖨️", "📺", "📷", "📹", "🎥", "📞"]),
      ("tools", ["🔧", "🔨", "⚒️", "🛠️", "⛏️", "🔩", "⚙️", "🧰", "🔧", "🗜️"]),
      ("transport", ["🚗", "🚕", "🚙", "🚌", "🚎", "🏎️", "🚓", "🚑", "🚒", "🚐"]),
    ],
  ),
  (
    "symbols",
    &[
      ("arrows", ["⬆️", "⬇️", "⬅️", "➡️", "↗️", "↘️", "↙️", "↖️", "↕️", "↔️"]),
      ("shapes", ["🔴", "🟠", "🟡", "🟢", "🔵", "🟣", "⚫", "⚪", "🟤", "🔶"]),
      ("numbers", ["0️⃣", "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣"]),
    ],
  ),
];

impl Catalog {
  /// The built-in emoji catalog: 4 categories, 13 subcategories, 130 items.
  pub fn builtin() -> Self {
    let builder = BUILTIN.iter().fold(Catalog::builder(), |builder, (category, subs)| {
      subs
        .iter()
        .fold(builder, |builder, (sub, items)| builder.subcategory(category, sub, *items))
    });

    // Static table has unique names, so build() cannot fail here.
    builder.build().unwrap_or_default()
  }
}
