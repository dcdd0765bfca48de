use protolife_core::agent::Agent;
use protolife_core::Field;

const RAMP: &[u8] = b" .:-=+*#%";
const AGENT_GLYPH: char = '@';

/// ASCII frame of the nutrient grid with agents overlaid. Nutrient levels
/// are normalized against the current grid maximum, like the original
/// display frame, so the source stays visible as the scale shifts.
pub fn ascii_frame(field: &Field, agents: &[Agent]) -> String {
    let width = field.width();
    let height = field.height();
    let max = field.nutrient().iter().cloned().fold(0.0_f64, f64::max);

    let mut cells = vec![vec![' '; width]; height];
    for (y, row) in cells.iter_mut().enumerate() {
        for (x, cell) in row.iter_mut().enumerate() {
            if max > 0.0 {
                let t = field.get_nutrient(x, y) / max;
                let idx = (t * (RAMP.len() - 1) as f64).round() as usize;
                *cell = RAMP[idx.min(RAMP.len() - 1)] as char;
            }
        }
    }
    for agent in agents {
        let (x, y) = agent.position();
        cells[y][x] = AGENT_GLYPH;
    }

    let mut frame = String::with_capacity((width + 1) * height);
    for row in cells {
        frame.extend(row);
        frame.push('\n');
    }
    frame
}
