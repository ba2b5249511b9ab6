use colored::*;

use crate::terminal::print;

const BANNER_0: &str = r#"
           ____  __  __ ____  ____   ___  ___  ____  ____
          / ___)(  )(  |  _ \/ ___) / __)/ _ \(  _ \( ___)
          \___ \ )(__)( ) _ <\___ \( (__( (_) ))___/ )__)
          (____/(______|____/(____/ \___)\___/(__)  (____)
"#;

const BANNER_1: &str = r#"
                  _
        ___ _   _| |__  ___  ___ ___  _ __   ___
       / __| | | | '_ \/ __|/ __/ _ \| '_ \ / _ \
       \__ \ |_| | |_) \__ \ (_| (_) | |_) |  __/
       |___/\__,_|_.__/|___/\___\___/| .__/ \___|
                                     |_|
"#;

const BANNER_2: &str = r#"
            .-.
           (o o)    *.example.com
           | O \        |-- www
            \   \       |-- api
             `~~~'      `-- mail
"#;

pub fn print() {
    let banner: ColoredString = match rand::random_range(0..3u8) {
        0 => BANNER_0.bright_green(),
        1 => BANNER_1.truecolor(255, 165, 0),
        _ => BANNER_2.blue(),
    };
    print::print(&format!("{banner}"));
}
