// cell.rs - Cell-type codes, the text codec and the door/item requirement table

use serde::{Deserialize, Serialize};

/// Every code a grid cell can carry. The generator only ever writes a
/// subset of these (doors, items, `Energy`, `Map`); the rest exist so
/// that center templates can stamp them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Rock,
    Energy,
    RedDoor,
    RedKey,
    GreenDoor,
    GreenKey,
    BlueDoor,
    BlueKey,
    YellowDoor,
    YellowKey,
    Lever,
    ToggleDoor,
    InverseToggleDoor,
    ElectricBoxA,
    ElectricBoxB,
    ElectricBoxC,
    ElectricDoorA,
    ElectricDoorB,
    ElectricDoorC,
    Drone,
    BigDoor,
    Map,
    Gun,
    Portal,
    PlayerStart,
}

/// Items a door demands before it opens. A one-time item is consumed by a
/// single door and placed fresh for every occurrence of the door type; a
/// reuse item is shared by every door of its type and placed exactly once
/// per generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorRequirement {
    pub one_time_item: Option<Cell>,
    pub reuse_item: Option<Cell>,
}

/// The gating door types chained along the main path, one of each.
pub const ALL_MAIN_DOORS: [Cell; 9] = [
    Cell::RedDoor,
    Cell::GreenDoor,
    Cell::BlueDoor,
    Cell::YellowDoor,
    Cell::ToggleDoor,
    Cell::ElectricDoorA,
    Cell::ElectricDoorB,
    Cell::ElectricDoorC,
    Cell::BigDoor,
];

impl Cell {
    /// Requirement table for gating doors; `None` for anything that is
    /// not a main-door type.
    pub fn door_requirement(self) -> Option<DoorRequirement> {
        let (one_time_item, reuse_item) = match self {
            Cell::RedDoor => (Some(Cell::RedKey), None),
            Cell::GreenDoor => (Some(Cell::GreenKey), None),
            Cell::BlueDoor => (Some(Cell::BlueKey), None),
            Cell::YellowDoor => (Some(Cell::YellowKey), None),
            Cell::ToggleDoor => (None, Some(Cell::Lever)),
            Cell::ElectricDoorA => (Some(Cell::Energy), Some(Cell::ElectricBoxA)),
            Cell::ElectricDoorB => (Some(Cell::Energy), Some(Cell::ElectricBoxB)),
            Cell::ElectricDoorC => (Some(Cell::Energy), Some(Cell::ElectricBoxC)),
            Cell::BigDoor => (Some(Cell::Gun), None),
            _ => return None,
        };
        Some(DoorRequirement {
            one_time_item,
            reuse_item,
        })
    }

    /// Items whose ancestor chains define the main path during the side
    /// pass: everything a main-pass door can demand, plus the map reward.
    pub fn is_important_item(self) -> bool {
        matches!(
            self,
            Cell::RedKey
                | Cell::GreenKey
                | Cell::BlueKey
                | Cell::YellowKey
                | Cell::Lever
                | Cell::ElectricBoxA
                | Cell::ElectricBoxB
                | Cell::ElectricBoxC
                | Cell::Energy
                | Cell::Gun
                | Cell::Map
        )
    }

    /// Decode one template character. Unrecognized characters map to
    /// `Empty`, matching the level text format.
    pub fn from_char(c: char) -> Cell {
        match c {
            '#' => Cell::Wall,
            '%' => Cell::Rock,
            '*' => Cell::Energy,
            'R' => Cell::RedDoor,
            'r' => Cell::RedKey,
            'G' => Cell::GreenDoor,
            'g' => Cell::GreenKey,
            'B' => Cell::BlueDoor,
            'b' => Cell::BlueKey,
            'Y' => Cell::YellowDoor,
            'y' => Cell::YellowKey,
            'L' => Cell::Lever,
            'T' => Cell::ToggleDoor,
            'I' => Cell::InverseToggleDoor,
            '1' => Cell::ElectricBoxA,
            '2' => Cell::ElectricBoxB,
            '3' => Cell::ElectricBoxC,
            '4' => Cell::ElectricDoorA,
            '5' => Cell::ElectricDoorB,
            '6' => Cell::ElectricDoorC,
            'V' => Cell::Drone,
            'X' => Cell::BigDoor,
            'M' => Cell::Map,
            'W' => Cell::Gun,
            'P' => Cell::Portal,
            'S' => Cell::PlayerStart,
            _ => Cell::Empty,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Wall => '#',
            Cell::Rock => '%',
            Cell::Energy => '*',
            Cell::RedDoor => 'R',
            Cell::RedKey => 'r',
            Cell::GreenDoor => 'G',
            Cell::GreenKey => 'g',
            Cell::BlueDoor => 'B',
            Cell::BlueKey => 'b',
            Cell::YellowDoor => 'Y',
            Cell::YellowKey => 'y',
            Cell::Lever => 'L',
            Cell::ToggleDoor => 'T',
            Cell::InverseToggleDoor => 'I',
            Cell::ElectricBoxA => '1',
            Cell::ElectricBoxB => '2',
            Cell::ElectricBoxC => '3',
            Cell::ElectricDoorA => '4',
            Cell::ElectricDoorB => '5',
            Cell::ElectricDoorC => '6',
            Cell::Drone => 'V',
            Cell::BigDoor => 'X',
            Cell::Map => 'M',
            Cell::Gun => 'W',
            Cell::Portal => 'P',
            Cell::PlayerStart => 'S',
        }
    }
}
