//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

pub const HELP: &str = r#"Show the module hierarchy of Verilog/SystemVerilog designs.

Usage:
    vhier [options] <file>...

Options:
    <file>...               input files, processed in order
    --define, -D <name[=value]>   define a macro (repeatable)
    --undefine, -U <name>   undefine a macro (repeatable)
    --include, -I <path>    add an `include search directory (repeatable)
    --standard <std>        language standard (1995, 2001, 2005, sv2005,
                            sv2009, sv2012, sv2017, sv2023, vams)
    --top-module <name>     restrict output to the hierarchy under <name>
    --modules               list module names only
    --cells                 list the cell hierarchy indented by depth
    --module-files          emit `module TAB file` lines
    --xml                   emit the hierarchy as an XML tree
    --strict                escalate link problems to a failing exit code

With no output mode selected, the cell hierarchy is shown."#;
