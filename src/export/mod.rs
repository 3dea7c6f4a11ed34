use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentSnapshot, Species, Status};
use crate::world::{Position, Terrain, World};

/// One agent's state at the end of a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Zero-based index of the tick the record was taken after.
    pub time: u64,
    pub species: Species,
    pub status: Status,
    pub x: i32,
    pub y: i32,
    pub energy: Option<i32>,
}

impl TickRecord {
    pub fn from_snapshot(time: u64, agent: &AgentSnapshot) -> Self {
        TickRecord {
            time,
            species: agent.species,
            status: agent.status,
            x: agent.position.x,
            y: agent.position.y,
            energy: agent.energy,
        }
    }
}

/// Errors that can occur while writing tick records.
#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Serialize(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {}", e),
            ExportError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Buffered JSON-lines sink, one record per line.
pub struct RecordWriter {
    out: BufWriter<File>,
    written: u64,
}

impl RecordWriter {
    /// Create (or truncate) `path`, making parent directories as needed.
    pub fn create(path: &Path) -> Result<Self, ExportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(RecordWriter {
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write(&mut self, record: &TickRecord) -> Result<(), ExportError> {
        serde_json::to_writer(&mut self.out, record)
            .map_err(|e| ExportError::Serialize(e.to_string()))?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Write one record per agent for tick `time`.
    pub fn write_tick(&mut self, time: u64, agents: &[AgentSnapshot]) -> Result<(), ExportError> {
        for agent in agents {
            self.write(&TickRecord::from_snapshot(time, agent))?;
        }
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<u64, ExportError> {
        self.out.flush()?;
        Ok(self.written)
    }
}

/// Read back a JSON-lines file written by `RecordWriter`.
pub fn read_records(path: &Path) -> Result<Vec<TickRecord>, ExportError> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(|e| ExportError::Serialize(e.to_string())))
        .collect()
}

fn glyph(agent: &AgentSnapshot) -> char {
    match (agent.species, agent.status) {
        (Species::Fish, Status::Dead) => 'x',
        (Species::Fish, _) => 'f',
        (Species::Penguin, Status::Dead) => '+',
        (Species::Penguin, Status::Full) => 'p',
        (Species::Penguin, _) => 'P',
        (Species::Seal, Status::Full) => 's',
        (Species::Seal, _) => 'S',
    }
}

/// Rank used when several agents share a block; highest wins.
fn glyph_rank(agent: &AgentSnapshot) -> u8 {
    let species = match agent.species {
        Species::Fish => 0,
        Species::Penguin => 2,
        Species::Seal => 4,
    };
    if agent.status == Status::Dead {
        species
    } else {
        species + 1
    }
}

/// Text frame of the grid, one character per `cell` x `cell` block, north up.
///
/// Empty blocks show the terrain of their lower-left cell (`~` water,
/// `#` land).
pub fn render_ascii(world: &World, agents: &[AgentSnapshot], cell: usize) -> String {
    let size = world.size().max(0) as usize;
    let cell = cell.max(1);
    let blocks = size.div_ceil(cell);

    let mut occupant: Vec<Option<&AgentSnapshot>> = vec![None; blocks * blocks];
    for agent in agents {
        let (x, y) = (agent.position.x, agent.position.y);
        if x < 0 || y < 0 || x as usize >= size || y as usize >= size {
            continue;
        }
        let slot = &mut occupant[(y as usize / cell) * blocks + x as usize / cell];
        match slot {
            Some(current) if glyph_rank(current) >= glyph_rank(agent) => {}
            _ => *slot = Some(agent),
        }
    }

    let mut frame = String::with_capacity(blocks * (blocks + 1));
    for by in (0..blocks).rev() {
        for bx in 0..blocks {
            let ch = match occupant[by * blocks + bx] {
                Some(agent) => glyph(agent),
                None => {
                    let corner = Position::new((bx * cell) as i32, (by * cell) as i32);
                    match world.terrain.terrain_at(corner) {
                        Ok(Terrain::Land) => '#',
                        _ => '~',
                    }
                }
            };
            frame.push(ch);
        }
        frame.push('\n');
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ecology::LandRegion;
    use tempfile::TempDir;

    fn snapshot(species: Species, status: Status, x: i32, y: i32) -> AgentSnapshot {
        AgentSnapshot {
            id: 0,
            species,
            status,
            position: Position::new(x, y),
            energy: (species == Species::Penguin).then_some(12),
        }
    }

    #[test]
    fn writes_one_line_per_agent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ticks.jsonl");
        let agents = vec![
            snapshot(Species::Fish, Status::Alive, 150, 50),
            snapshot(Species::Penguin, Status::Hunt, 70, 70),
        ];

        let mut writer = RecordWriter::create(&path).unwrap();
        writer.write_tick(0, &agents).unwrap();
        writer.write_tick(1, &agents).unwrap();
        assert_eq!(writer.finish().unwrap(), 4);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert_eq!(
            content.lines().next().unwrap(),
            r#"{"time":0,"species":"fish","status":"alive","x":150,"y":50,"energy":null}"#
        );

        let records = read_records(&path).unwrap();
        assert_eq!(records[3].time, 1);
        assert_eq!(records[3].species, Species::Penguin);
        assert_eq!(records[3].energy, Some(12));
    }

    #[test]
    fn malformed_line_is_a_serialize_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"time\": 0}\n").unwrap();
        assert!(matches!(
            read_records(&path),
            Err(ExportError::Serialize(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_records(&dir.path().join("absent.jsonl")).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn ascii_frame_shows_terrain_and_agents() {
        let land = LandRegion {
            x: [2, 4],
            y: [0, 2],
        };
        let world = World::new(4, &land);
        let agents = vec![
            snapshot(Species::Fish, Status::Alive, 0, 3),
            snapshot(Species::Penguin, Status::Full, 3, 1),
        ];
        let frame = render_ascii(&world, &agents, 1);
        assert_eq!(frame, "f~~~\n~~~~\n~~#p\n~~##\n");
    }

    #[test]
    fn predators_win_shared_blocks() {
        let world = World::new(4, &LandRegion { x: [0, 1], y: [0, 1] });
        let agents = vec![
            snapshot(Species::Fish, Status::Alive, 0, 0),
            snapshot(Species::Seal, Status::Hunt, 1, 1),
            snapshot(Species::Penguin, Status::Dead, 1, 0),
        ];
        let frame = render_ascii(&world, &agents, 2);
        assert_eq!(frame, "~~\nS~\n");
    }

    #[test]
    fn dead_agents_keep_distinct_glyphs() {
        let world = World::new(2, &LandRegion { x: [0, 1], y: [0, 1] });
        let agents = vec![
            snapshot(Species::Fish, Status::Dead, 1, 1),
            snapshot(Species::Penguin, Status::Dead, 0, 0),
        ];
        assert_eq!(render_ascii(&world, &agents, 1), "~x\n+~\n");
    }
}
